//! Command registration and dispatch.
//!
//! Command modules describe themselves with [`CommandDescriptor`]s and add
//! them to a [`CommandRegistry`]. The [`Dispatcher`] turns the descriptors of
//! the active engine mode into a clap command tree and runs the selected one.

pub mod alias;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod flags;
pub mod globals;
pub mod registry;

pub use alias::{TextRewrite, derive_alias};
pub use descriptor::{ArgPolicy, CommandDescriptor, Handler, Invocation};
pub use dispatch::Dispatcher;
pub use error::{CommandError, RegistrationError};
pub use flags::FlagSet;
pub use globals::GlobalFlags;
pub use registry::CommandRegistry;
