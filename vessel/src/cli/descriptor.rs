//! Command descriptors: one command's grammar, help, handler and modes.

use crate::cli::CommandError;
use crate::context::AppContext;
use clap::{Arg, ArgMatches};
use libvessel::EngineMode;
use std::fmt;
use std::sync::Arc;

/// Parsed invocation handed to a [`Handler`].
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Command path without the binary name, e.g. `image list`
    pub path: String,
    /// Positional arguments
    pub args: Vec<String>,
    /// Flag values of the selected command
    pub matches: ArgMatches,
}

type HandlerFn = dyn Fn(&AppContext, &Invocation) -> Result<(), CommandError> + Send + Sync;

/// Shared command implementation.
///
/// Cloning a handler shares the function rather than copying it, so an alias
/// and its source run the very same code.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&AppContext, &Invocation) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, ctx: &AppContext, invocation: &Invocation) -> Result<(), CommandError> {
        (self.0)(ctx, invocation)
    }

    /// Whether both handlers share one function.
    pub fn same_as(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// How many positional arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgPolicy {
    #[default]
    Arbitrary,
    None,
    Exact(usize),
    Minimum(usize),
    Maximum(usize),
    /// Inclusive bounds
    Range(usize, usize),
}

impl ArgPolicy {
    /// Checks `args` against the policy.
    ///
    /// `command` is the full command line prefix used in messages, e.g.
    /// `vessel login`.
    pub fn validate(self, command: &str, args: &[String]) -> Result<(), CommandError> {
        let received = args.len();
        let message = match self {
            Self::Arbitrary => return Ok(()),
            Self::None => match args.first() {
                Some(arg) => format!("unknown command {:?} for {:?}", arg, command),
                None => return Ok(()),
            },
            Self::Exact(n) if received != n => {
                format!("accepts {} arg(s), received {}", n, received)
            }
            Self::Minimum(n) if received < n => {
                format!(
                    "requires at least {} arg(s), only received {}",
                    n, received
                )
            }
            Self::Maximum(n) if received > n => {
                format!("accepts at most {} arg(s), received {}", n, received)
            }
            Self::Range(min, max) if received < min || received > max => format!(
                "accepts between {} and {} arg(s), received {}",
                min, max, received
            ),
            _ => return Ok(()),
        };
        Err(CommandError::Usage(message))
    }
}

/// A command's invocation grammar bound to the engine modes it is valid in.
#[derive(Debug, Clone, Default)]
pub struct CommandDescriptor {
    /// Path of the parent group, e.g. `image`
    pub parent: Option<String>,
    /// Usage template; its first word is the command name
    pub usage: String,
    pub aliases: Vec<String>,
    pub short: String,
    pub long: String,
    pub example: String,
    pub args: ArgPolicy,
    pub flags: Vec<Arg>,
    /// `None` for groups that only hold subcommands
    pub handler: Option<Handler>,
    pub modes: Vec<EngineMode>,
}

impl CommandDescriptor {
    pub fn new(usage: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
            ..Self::default()
        }
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short = short.into();
        self
    }

    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = long.into();
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    pub fn args(mut self, policy: ArgPolicy) -> Self {
        self.args = policy;
        self
    }

    pub fn flags(mut self, flags: Vec<Arg>) -> Self {
        self.flags = flags;
        self
    }

    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn modes(mut self, modes: impl IntoIterator<Item = EngineMode>) -> Self {
        self.modes = modes.into_iter().collect();
        self
    }

    /// The command name: first word of the usage template.
    pub fn name(&self) -> &str {
        self.usage.split_whitespace().next().unwrap_or("")
    }

    /// Name plus aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Full command path, e.g. `image list`.
    pub fn path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{} {}", parent, self.name()),
            None => self.name().to_string(),
        }
    }

    pub fn supports(&self, mode: EngineMode) -> bool {
        self.modes.contains(&mode)
    }

    pub fn is_group(&self) -> bool {
        self.handler.is_none()
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
