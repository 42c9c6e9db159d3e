//! Vessel - engine-facing services for the vessel container CLI
//!
//! `libvessel` holds everything the command layer delegates to: the engine
//! execution modes, registry authentication and its credential file, and the
//! image listing services for in-process and remote engines.
//!
//! # Quick Start
//!
//! ```no_run
//! use libvessel::auth::{LoginOptions, RegistryAuthenticator};
//! use libvessel::{Authenticator, SecurityContext};
//! use tokio_util::sync::CancellationToken;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = LoginOptions {
//!         username: Some("alice".to_string()),
//!         password: Some("s3cret".to_string()),
//!         ..LoginOptions::default()
//!     };
//!
//!     RegistryAuthenticator::new().login(
//!         &CancellationToken::new(),
//!         SecurityContext::default(),
//!         &options,
//!         "quay.io",
//!     )?;
//!     Ok(())
//! }
//! ```
//!
//! # Main Types
//!
//! - [`EngineMode`] - How the engine is reached (in-process or remote)
//! - [`Authenticator`] - Registry login/logout collaborator
//! - [`SecurityContext`] - Per-invocation credential file, certificates and TLS policy
//! - [`ImageService`] - Image listing collaborator
//! - [`VesselError`] - Error type shared by every operation

#![warn(clippy::all)]

/// Returns the libvessel crate version.
///
/// # Examples
///
/// ```
/// let version = libvessel::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use auth::{Authenticator, Credentials, SecurityContext, TlsVerification};
pub use engine::EngineMode;
pub use error::{Result, VesselError};
pub use image::{ImageFilter, ImageListOptions, ImageService, ImageSummary};
pub use tristate::OptionalBool;

pub mod auth;
pub mod client;
pub mod engine;
pub mod error;
pub mod image;
pub mod tristate;
