//! Errors raised while building and running the command tree.

use libvessel::{EngineMode, VesselError};
use thiserror::Error;

/// A command definition that cannot be registered.
///
/// These are programming errors in a command module; `main` aborts start-up
/// on the first one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("command '{path}' is not valid in any engine mode")]
    EmptyModes { path: String },

    #[error("command '{path}' is already registered for {mode} mode")]
    DuplicateCommand { path: String, mode: EngineMode },

    #[error("command '{command}' defines flag '{flag}' more than once")]
    DuplicateFlag { command: String, flag: String },

    #[error("command '{path}' names parent '{parent}', which is not registered for {mode} mode")]
    MissingParent {
        path: String,
        parent: String,
        mode: EngineMode,
    },
}

/// Failure of a single command invocation.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Bad arguments; detected before any collaborator is contacted
    #[error("{0}")]
    Usage(String),

    /// Flag parsing failure, including `--help` and `--version` requests
    #[error(transparent)]
    Parse(#[from] clap::Error),

    /// Failure reported by a collaborator, shown verbatim
    #[error(transparent)]
    Delegated(#[from] VesselError),

    /// Rendering the command's output failed
    #[error("{0}")]
    Output(String),
}

impl CommandError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}
