//! Builds the clap command tree for one engine mode and runs commands.

use crate::cli::flags::flag_keys;
use crate::cli::{CommandDescriptor, CommandError, CommandRegistry, Invocation, RegistrationError};
use crate::context::AppContext;
use clap::builder::BoolishValueParser;
use clap::{Arg, ArgAction, Command, value_parser};
use libvessel::EngineMode;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;

pub const BINARY: &str = "vessel";

/// Id of the hidden positional that collects a command's arguments.
pub const TRAILING_ARGS: &str = "args";

/// Global flags shared by every command.
pub fn global_args() -> Vec<Arg> {
    vec![
        Arg::new("remote")
            .long("remote")
            .short('r')
            .global(true)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_parser(BoolishValueParser::new())
            .help("Access a remote engine"),
        Arg::new("url")
            .long("url")
            .global(true)
            .value_name("URL")
            .help("URL of the remote engine"),
        Arg::new("config")
            .long("config")
            .global(true)
            .value_name("PATH")
            .value_parser(value_parser!(PathBuf))
            .help("Path of the vessel config file"),
        Arg::new("color")
            .long("color")
            .global(true)
            .value_parser(["auto", "always", "never"])
            .help("Control colored output"),
        Arg::new("verbose")
            .long("verbose")
            .short('v')
            .global(true)
            .action(ArgAction::Count)
            .help("Verbose output (can be repeated: -v, -vv, -vvv)"),
    ]
}

/// The command tree of one engine mode.
#[derive(Debug)]
pub struct Dispatcher<'r> {
    registry: &'r CommandRegistry,
    mode: EngineMode,
    root: Command,
}

impl<'r> Dispatcher<'r> {
    /// Builds the tree from the descriptors valid in `mode`.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::MissingParent`] when a command's group is not
    /// available in `mode`, [`RegistrationError::DuplicateFlag`] when a
    /// command reuses a global flag.
    pub fn new(registry: &'r CommandRegistry, mode: EngineMode) -> Result<Self, RegistrationError> {
        let commands = registry.filter(mode);
        let paths: HashSet<String> = commands.iter().map(|c| c.path()).collect();

        for command in &commands {
            if let Some(parent) = &command.parent {
                if !paths.contains(parent) {
                    return Err(RegistrationError::MissingParent {
                        path: command.path(),
                        parent: parent.clone(),
                        mode,
                    });
                }
            }
        }

        let mut reserved: HashSet<String> = global_args()
            .iter()
            .flat_map(flag_keys)
            .map(|(key, _)| key)
            .collect();
        reserved.extend([
            format!("id:{}", TRAILING_ARGS),
            "id:help".to_string(),
            "--help".to_string(),
            "-h".to_string(),
            "--version".to_string(),
            "-V".to_string(),
        ]);

        let mut root = Command::new(BINARY)
            .about("Manage container images and registry logins")
            .version(env!("CARGO_PKG_VERSION"))
            .args(global_args());

        for command in commands.iter().filter(|c| c.parent.is_none()) {
            root = root.subcommand(build_command(command, &commands, &reserved)?);
        }

        tracing::debug!(%mode, commands = commands.len(), "built command tree");
        Ok(Self {
            registry,
            mode,
            root,
        })
    }

    /// The clap command, e.g. for rendering help.
    pub fn command(&self) -> &Command {
        &self.root
    }

    /// Parses `argv` (binary name first) and runs the selected command.
    pub fn dispatch<I, T>(&self, ctx: &AppContext, argv: I) -> Result<(), CommandError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.root.clone().try_get_matches_from(argv)?;

        let mut words = Vec::new();
        let mut selected = &matches;
        while let Some((name, sub)) = selected.subcommand() {
            words.push(name.to_string());
            selected = sub;
        }

        if words.is_empty() {
            return Err(CommandError::usage(format!(
                "missing command '{} COMMAND'",
                BINARY
            )));
        }

        let path = words.join(" ");
        let descriptor = self.registry.find(self.mode, &path).ok_or_else(|| {
            CommandError::usage(format!("unrecognized command '{} {}'", BINARY, path))
        })?;

        let Some(handler) = &descriptor.handler else {
            return Err(CommandError::usage(format!(
                "missing command '{} {} COMMAND'",
                BINARY, path
            )));
        };

        let args: Vec<String> = selected
            .get_many::<String>(TRAILING_ARGS)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        descriptor
            .args
            .validate(&format!("{} {}", BINARY, path), &args)?;

        tracing::debug!(command = %path, mode = %self.mode, args = args.len(), "dispatching");
        handler.call(
            ctx,
            &Invocation {
                path,
                args,
                matches: selected.clone(),
            },
        )
    }
}

fn build_command(
    descriptor: &CommandDescriptor,
    all: &[&CommandDescriptor],
    reserved: &HashSet<String>,
) -> Result<Command, RegistrationError> {
    let path = descriptor.path();

    for arg in &descriptor.flags {
        for (key, name) in flag_keys(arg) {
            if reserved.contains(&key) {
                return Err(RegistrationError::DuplicateFlag {
                    command: path.clone(),
                    flag: name,
                });
            }
        }
    }

    let mut command = Command::new(descriptor.name().to_string())
        .about(descriptor.short.clone())
        .override_usage(format!("{} {}", BINARY, qualified_usage(descriptor)))
        .visible_aliases(descriptor.aliases.clone())
        .args(descriptor.flags.clone());

    if !descriptor.long.is_empty() {
        command = command.long_about(descriptor.long.clone());
    }
    if !descriptor.example.is_empty() {
        command = command.after_help(format!("Examples:\n  {}", descriptor.example));
    }

    if descriptor.is_group() {
        for child in all
            .iter()
            .filter(|c| c.parent.as_deref() == Some(path.as_str()))
        {
            command = command.subcommand(build_command(child, all, reserved)?);
        }
    } else {
        command = command.arg(
            Arg::new(TRAILING_ARGS)
                .num_args(0..)
                .action(ArgAction::Append)
                .hide(true),
        );
    }

    Ok(command)
}

/// Usage with the parent path in front, e.g. `image list [flags] [IMAGE]`.
fn qualified_usage(descriptor: &CommandDescriptor) -> String {
    match &descriptor.parent {
        Some(parent) => format!("{} {}", parent, descriptor.usage),
        None => descriptor.usage.clone(),
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
