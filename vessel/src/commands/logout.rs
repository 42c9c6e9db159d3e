//! `logout`: remove stored registry credentials.

use crate::cli::{
    ArgPolicy, CommandDescriptor, CommandError, CommandRegistry, FlagSet, Handler, RegistrationError,
};
use crate::commands::auth_flags;
use crate::context::AppContext;
use libvessel::auth::LogoutOptions;
use libvessel::{EngineMode, SecurityContext};

const EXAMPLE: &str = "vessel logout quay.io
  vessel logout --authfile dir/auth.json quay.io
  vessel logout --all";

pub fn flag_set() -> Result<FlagSet<LogoutOptions>, RegistrationError> {
    FlagSet::compose("logout", auth_flags::logout_flags(), Vec::new())
}

pub fn descriptor() -> Result<CommandDescriptor, RegistrationError> {
    let flags = flag_set()?;
    let args = flags.args();

    Ok(CommandDescriptor::new("logout [flags] [REGISTRY]")
        .short("Logout of a container registry")
        .long("Remove the cached username and password for the registry.")
        .example(EXAMPLE)
        .args(ArgPolicy::Maximum(1))
        .flags(args)
        .handler(Handler::new(move |ctx, invocation| {
            let mut options = LogoutOptions::default();
            flags.bind(&invocation.matches, &mut options);
            run(ctx, &options, invocation.args.first().map(String::as_str))
        }))
        .modes(EngineMode::ALL))
}

pub fn register(registry: &mut CommandRegistry) -> Result<(), RegistrationError> {
    registry.register(descriptor()?)
}

pub fn run(
    ctx: &AppContext,
    options: &LogoutOptions,
    server: Option<&str>,
) -> Result<(), CommandError> {
    match (server, options.all) {
        (None, false) => {
            return Err(CommandError::usage(
                "registry must be given unless --all is used",
            ));
        }
        (Some(_), true) => {
            return Err(CommandError::usage(
                "--all takes no registry argument",
            ));
        }
        _ => {}
    }

    let auth_file = options
        .auth_file
        .clone()
        .or_else(|| ctx.config.auth.auth_file.clone());
    let security = SecurityContext {
        auth_file,
        ..SecurityContext::default()
    };

    tracing::debug!(server = ?server, all = options.all, "logging out");
    ctx.authenticator.logout(security, options, server)?;
    Ok(())
}

#[cfg(test)]
#[path = "logout_tests.rs"]
mod tests;
