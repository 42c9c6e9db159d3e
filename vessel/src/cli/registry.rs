//! The command registry.
//!
//! Command modules append their descriptors during start-up; the dispatcher
//! then reads the registry filtered by the active engine mode. The registry
//! is an ordinary value owned by `main`, so registration happens through a
//! `&mut` borrow and dispatch through a shared one.

use crate::cli::{CommandDescriptor, RegistrationError};
use libvessel::EngineMode;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a descriptor.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::EmptyModes`] when the descriptor is valid in no
    /// mode, [`RegistrationError::DuplicateCommand`] when one of its names is
    /// already taken under the same parent in a mode both commands share.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistrationError> {
        let path = descriptor.path();

        if descriptor.modes.is_empty() {
            return Err(RegistrationError::EmptyModes { path });
        }

        for existing in &self.commands {
            if existing.parent != descriptor.parent {
                continue;
            }
            let clash = existing
                .names()
                .any(|name| descriptor.names().any(|other| other == name));
            if !clash {
                continue;
            }
            if let Some(mode) = descriptor
                .modes
                .iter()
                .find(|mode| existing.supports(**mode))
            {
                return Err(RegistrationError::DuplicateCommand { path, mode: *mode });
            }
        }

        tracing::trace!(command = %path, modes = ?descriptor.modes, "registered command");
        self.commands.push(descriptor);
        Ok(())
    }

    /// Descriptors valid in `mode`, in registration order.
    pub fn filter(&self, mode: EngineMode) -> Vec<&CommandDescriptor> {
        self.commands.iter().filter(|c| c.supports(mode)).collect()
    }

    /// Resolves a command path such as `image ls` within `mode`.
    ///
    /// Every word of the path may be a name or an alias.
    pub fn find(&self, mode: EngineMode, path: &str) -> Option<&CommandDescriptor> {
        let mut parent: Option<String> = None;
        let mut found = None;

        for word in path.split_whitespace() {
            let descriptor = self.commands.iter().find(|c| {
                c.supports(mode) && c.parent == parent && c.names().any(|name| name == word)
            })?;
            parent = Some(descriptor.path());
            found = Some(descriptor);
        }

        found
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Spellings of every command flag that takes its value as the next
    /// word, e.g. `-p` and `--password`.
    ///
    /// The early global scan skips those values so that `login -p --remote`
    /// does not read the password as a global flag.
    pub fn value_flags(&self) -> HashSet<String> {
        let mut names = HashSet::new();
        for arg in self.commands.iter().flat_map(|c| c.flags.iter()) {
            if !arg.get_action().takes_values() || arg.is_require_equals_set() {
                continue;
            }
            if let Some(long) = arg.get_long() {
                names.insert(format!("--{}", long));
            }
            if let Some(short) = arg.get_short() {
                names.insert(format!("-{}", short));
            }
        }
        names
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
