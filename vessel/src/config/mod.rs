use crate::format::{ColorChoice, OutputFormat};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Style configuration
    #[serde(default)]
    pub style: StyleConfig,
    /// Engine connection configuration
    #[serde(default)]
    pub engine: EngineConfig,
    /// Registry authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Style configuration section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Output format: pretty, json, yaml
    #[serde(default)]
    pub format: OutputFormat,
    /// Color output control: auto, always, never
    #[serde(default)]
    pub color: ColorChoice,
}

/// Engine section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reach the engine over the network instead of in-process
    #[serde(default)]
    pub remote: bool,
    /// URL of the remote engine's REST API
    #[serde(default = "default_engine_url")]
    pub url: String,
    /// Storage directory used in direct mode
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,
}

fn default_engine_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_storage_root() -> PathBuf {
    get_default_storage_root()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            remote: false,
            url: default_engine_url(),
            storage_root: default_storage_root(),
        }
    }
}

/// Auth section; unset values fall back to the library defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Credential file used by login and logout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_file: Option<PathBuf>,
    /// Directory of extra registry certificates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), String> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, toml_str).map_err(|e| format!("Failed to write config file: {}", e))?;

        Ok(())
    }
}

/// Get the config file path, respecting VESSEL_CONFIG environment variable
pub fn get_config_path() -> PathBuf {
    if let Ok(config_path) = env::var("VESSEL_CONFIG") {
        return PathBuf::from(config_path);
    }

    // Default to ~/.config/vessel/config.toml
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("vessel").join("config.toml")
    } else {
        // Fallback to current directory
        PathBuf::from("config.toml")
    }
}

/// Get the default image storage directory
///
/// Uses the platform data directory (~/.local/share/vessel/storage on Linux).
pub fn get_default_storage_root() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("vessel").join("storage")
    } else {
        env::temp_dir().join("vessel-storage")
    }
}
