//! `login`: store registry credentials.

use crate::cli::{
    ArgPolicy, CommandDescriptor, CommandError, CommandRegistry, FlagSet, Handler, RegistrationError,
};
use crate::commands::auth_flags;
use crate::context::AppContext;
use clap::Arg;
use libvessel::auth::LoginOptions;
use libvessel::{EngineMode, OptionalBool, SecurityContext, TlsVerification};

const EXAMPLE: &str = "vessel login quay.io
  vessel login --username ... --password ... quay.io
  vessel login --authfile dir/auth.json quay.io";

/// Credential options plus the flags only `login` has
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginCommandOptions {
    pub credentials: LoginOptions,
    /// Unset unless `--tls-verify` was given
    pub tls_verify: OptionalBool,
}

pub fn flag_set() -> Result<FlagSet<LoginCommandOptions>, RegistrationError> {
    let local = FlagSet::<LoginCommandOptions>::new()
        .tri_state_flag(
            Arg::new("tls-verify")
                .long("tls-verify")
                .help("Require HTTPS and verify certificates when contacting registries"),
            |o| &mut o.tls_verify,
        )
        .bool_flag(
            Arg::new("get-login")
                .long("get-login")
                .help("Return the current login user for the registry"),
            |o| &mut o.credentials.get_login,
        );

    FlagSet::compose(
        "login",
        local,
        vec![auth_flags::login_flags().lift(|o: &mut LoginCommandOptions| &mut o.credentials)],
    )
}

pub fn descriptor() -> Result<CommandDescriptor, RegistrationError> {
    let flags = flag_set()?;
    let args = flags.args();

    // Direct and remote clients both keep credentials on this machine.
    Ok(CommandDescriptor::new("login [flags] REGISTRY")
        .short("Login to a container registry")
        .long("Login to a container registry on a specified server.")
        .example(EXAMPLE)
        .args(ArgPolicy::Exact(1))
        .flags(args)
        .handler(Handler::new(move |ctx, invocation| {
            let mut options = LoginCommandOptions::default();
            flags.bind(&invocation.matches, &mut options);
            let [server] = invocation.args.as_slice() else {
                return Err(CommandError::usage("login requires exactly one REGISTRY"));
            };
            run(ctx, &options, server)
        }))
        .modes(EngineMode::ALL))
}

pub fn register(registry: &mut CommandRegistry) -> Result<(), RegistrationError> {
    registry.register(descriptor()?)
}

/// The security context for one login: flag paths win over configured ones.
pub fn security_context(ctx: &AppContext, options: &LoginCommandOptions) -> SecurityContext {
    let credentials = &options.credentials;
    SecurityContext::new(
        credentials
            .auth_file
            .clone()
            .or_else(|| ctx.config.auth.auth_file.clone()),
        credentials
            .cert_dir
            .clone()
            .or_else(|| ctx.config.auth.cert_dir.clone()),
        TlsVerification::from(options.tls_verify),
    )
}

pub fn run(ctx: &AppContext, options: &LoginCommandOptions, server: &str) -> Result<(), CommandError> {
    let security = security_context(ctx, options);
    tracing::debug!(
        server,
        tls = ?security.tls_verification,
        get_login = options.credentials.get_login,
        "logging in"
    );

    ctx.authenticator
        .login(&ctx.cancel, security, &options.credentials, server)?;
    Ok(())
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
