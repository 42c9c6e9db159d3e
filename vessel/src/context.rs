//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only to every command handler.

use crate::cli::GlobalFlags;
use crate::config::{self, Config};
use crate::format::{self, ColorChoice, OutputFormatter};
use libvessel::auth::RegistryAuthenticator;
use libvessel::engine::parse_switch;
use libvessel::image::{LocalImageStore, TunnelImageService};
use libvessel::{Authenticator, EngineMode, ImageService, VesselError};
use std::env;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// How much diagnostic output to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VerbosityLevel {
    #[default]
    Normal,
    Verbose,
    Debug,
    Trace,
}

impl VerbosityLevel {
    /// Maps the number of `-v` flags to a level
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Normal,
            1 => VerbosityLevel::Verbose,
            2 => VerbosityLevel::Debug,
            _ => VerbosityLevel::Trace,
        }
    }
}

/// Environment variable overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// `VESSEL_REMOTE`
    pub remote: Option<String>,
    /// `VESSEL_URL`
    pub url: Option<String>,
    /// `VESSEL_COLOR`
    pub color: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            remote: env::var("VESSEL_REMOTE").ok(),
            url: env::var("VESSEL_URL").ok(),
            color: env::var("VESSEL_COLOR").ok(),
        }
    }
}

/// Applies environment and flag overrides on top of `config`
pub fn resolve_config(mut config: Config, env: &EnvOverrides, flags: &GlobalFlags) -> Config {
    if let Some(remote) = env.remote.as_deref().and_then(parse_switch) {
        config.engine.remote = remote;
    }
    if let Some(url) = env.url.as_ref().filter(|u| !u.is_empty()) {
        config.engine.url = url.clone();
    }
    if let Some(color) = &env.color {
        config.style.color = ColorChoice::from(color.as_str());
    }

    if let Some(remote) = flags.remote {
        config.engine.remote = remote;
    }
    if let Some(url) = &flags.url {
        config.engine.url = url.clone();
    }
    if let Some(color) = &flags.color {
        config.style.color = ColorChoice::from(color.as_str());
    }

    config
}

/// Application context with resolved configuration and runtime state
#[derive(Clone)]
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
    pub mode: EngineMode,
    pub verbosity: VerbosityLevel,
    /// Cancels in-flight collaborator work
    pub cancel: CancellationToken,
    pub images: Arc<dyn ImageService>,
    pub authenticator: Arc<dyn Authenticator>,
    pub output: Arc<dyn OutputFormatter>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("mode", &self.mode)
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build context with precedence: defaults > config file > env vars > CLI flags
    pub fn build(flags: &GlobalFlags, cancel: CancellationToken) -> Result<Self, VesselError> {
        let config_path = flags.config.clone().unwrap_or_else(config::get_config_path);
        let file_config = load_config_file(&config_path);
        let config = resolve_config(file_config, &EnvOverrides::from_env(), flags);
        let mode = EngineMode::from_remote(config.engine.remote);

        let images: Arc<dyn ImageService> = match mode {
            EngineMode::Direct => Arc::new(LocalImageStore::new(&config.engine.storage_root)),
            EngineMode::Remote => Arc::new(TunnelImageService::new(&config.engine.url)?),
        };

        tracing::debug!(
            %mode,
            config = %config_path.display(),
            url = %config.engine.url,
            "resolved engine"
        );

        let mut ctx = Self::with_services(
            config,
            mode,
            images,
            Arc::new(RegistryAuthenticator::new()),
        );
        ctx.verbosity = VerbosityLevel::from_count(flags.verbose);
        ctx.cancel = cancel;
        Ok(ctx)
    }

    /// Context around the given collaborators
    pub fn with_services(
        config: Config,
        mode: EngineMode,
        images: Arc<dyn ImageService>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        let output = Arc::from(format::create_formatter(config.style.color));
        Self {
            config,
            mode,
            verbosity: VerbosityLevel::Normal,
            cancel: CancellationToken::new(),
            images,
            authenticator,
            output,
        }
    }
}

/// Reads the config file; a missing file yields defaults and a broken one a
/// warning plus defaults
fn load_config_file(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
            Config::default()
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
