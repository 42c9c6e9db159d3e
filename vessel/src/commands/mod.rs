//! Command modules.
//!
//! Each module contributes its descriptors through a `register` function;
//! `main` calls [`register_all`] once before building the dispatcher.

use crate::cli::{CommandRegistry, RegistrationError};

/// Credential flags shared by `login` and `logout`
pub mod auth_flags;

/// Image command handlers
pub mod image;

/// `login` command
pub mod login;

/// `logout` command
pub mod logout;

/// `version` command
pub mod version;

#[cfg(test)]
pub(crate) mod testing;

/// Registers every command, in help order.
pub fn register_all(registry: &mut CommandRegistry) -> Result<(), RegistrationError> {
    image::register(registry)?;
    login::register(registry)?;
    logout::register(registry)?;
    version::register(registry)?;
    Ok(())
}
