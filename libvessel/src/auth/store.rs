//! Credential storage in a containers-style `auth.json` file.
//!
//! The file keeps one entry per registry under `auths`, each holding the
//! base64 encoding of `username:password`. Keys this module does not know
//! about (credential helpers, identity tokens) are preserved on rewrite.

use crate::auth::Credentials;
use crate::error::{Result, VesselError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Creates `path` afresh with mode 0600 and writes `bytes` to disk.
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound && path.is_file() => return Err(e),
        _ => {}
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Trait for storing and retrieving registry credentials.
pub trait CredentialStore {
    /// Store credentials for a registry.
    fn store(&mut self, registry: &str, credentials: &Credentials) -> Result<()>;

    /// Retrieve credentials for a registry.
    fn get(&self, registry: &str) -> Result<Option<Credentials>>;

    /// Remove credentials for a registry.
    ///
    /// Returns whether an entry existed.
    fn remove(&mut self, registry: &str) -> Result<bool>;

    /// Remove the credentials of every registry.
    fn remove_all(&mut self) -> Result<()>;

    /// List all registries with stored credentials.
    fn list(&self) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct AuthEntry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    auth: String,
    #[serde(flatten)]
    other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct AuthConfigFile {
    #[serde(default)]
    auths: BTreeMap<String, AuthEntry>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

/// File-backed credential store.
///
/// # Examples
///
/// ```no_run
/// use libvessel::auth::{AuthFile, CredentialStore, Credentials};
///
/// # fn example() -> libvessel::Result<()> {
/// let mut file = AuthFile::open("/run/user/1000/containers/auth.json")?;
/// file.store("quay.io", &Credentials::basic("alice", "s3cret"))?;
/// assert!(file.get("quay.io")?.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AuthFile {
    path: PathBuf,
    contents: AuthConfigFile,
}

impl AuthFile {
    /// Opens the auth file at `path`.
    ///
    /// A missing file behaves like an empty one; nothing is written until the
    /// first change.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let contents = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            AuthConfigFile::default()
        };

        Ok(Self { path, contents })
    }

    /// Returns the file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_file(path: &Path) -> Result<AuthConfigFile> {
        let contents = fs::read_to_string(path).map_err(|e| {
            VesselError::config_with_source("Failed to read auth file", path.to_str(), e)
        })?;

        if contents.trim().is_empty() {
            return Ok(AuthConfigFile::default());
        }

        serde_json::from_str(&contents).map_err(|e| {
            VesselError::config_with_source("Failed to parse auth file", path.to_str(), e)
        })
    }

    /// Writes the file with user-only permissions.
    ///
    /// The contents go to a sibling temporary file that is created 0600 and
    /// renamed over the target, so a failed write leaves the old file intact.
    fn save_to_file(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                VesselError::config_with_source(
                    "Failed to create auth file directory",
                    parent.to_str(),
                    e,
                )
            })?;
        }

        let contents = serde_json::to_string_pretty(&self.contents).map_err(|e| {
            VesselError::config_with_source("Failed to serialize auth file", self.path.to_str(), e)
        })?;

        let temp = self.temp_path();
        if let Err(e) = write_private(&temp, contents.as_bytes()) {
            let _ = fs::remove_file(&temp);
            return Err(VesselError::config_with_source(
                "Failed to write auth file",
                temp.to_str(),
                e,
            ));
        }

        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            VesselError::config_with_source("Failed to replace auth file", self.path.to_str(), e)
        })?;

        tracing::debug!(path = %self.path.display(), "saved auth file");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn encode_credential(credentials: &Credentials) -> Result<String> {
        match credentials {
            Credentials::Basic { username, password } => {
                use base64::{Engine as _, engine::general_purpose};
                Ok(general_purpose::STANDARD.encode(format!("{}:{}", username, password)))
            }
            Credentials::Anonymous => {
                Err(VesselError::validation("Cannot store anonymous credentials"))
            }
        }
    }

    fn decode_credential(registry: &str, encoded: &str) -> Result<Credentials> {
        use base64::{Engine as _, engine::general_purpose};
        let decoded = general_purpose::STANDARD.decode(encoded).map_err(|e| {
            VesselError::validation_with_source(
                format!("Invalid credentials for {} in auth file", registry),
                e,
            )
        })?;

        let decoded = String::from_utf8(decoded).map_err(|e| {
            VesselError::validation_with_source(
                format!("Invalid credential encoding for {}", registry),
                e,
            )
        })?;

        let (username, password) = decoded.split_once(':').ok_or_else(|| {
            VesselError::validation(format!(
                "Invalid credentials for {}: missing ':' separator",
                registry
            ))
        })?;

        Ok(Credentials::basic(username, password))
    }
}

impl CredentialStore for AuthFile {
    fn store(&mut self, registry: &str, credentials: &Credentials) -> Result<()> {
        let auth = Self::encode_credential(credentials)?;
        let entry = self.contents.auths.entry(registry.to_string()).or_default();
        entry.auth = auth;
        self.save_to_file()
    }

    fn get(&self, registry: &str) -> Result<Option<Credentials>> {
        match self.contents.auths.get(registry) {
            Some(entry) if !entry.auth.is_empty() => {
                Ok(Some(Self::decode_credential(registry, &entry.auth)?))
            }
            _ => Ok(None),
        }
    }

    fn remove(&mut self, registry: &str) -> Result<bool> {
        if self.contents.auths.remove(registry).is_none() {
            return Ok(false);
        }
        self.save_to_file()?;
        Ok(true)
    }

    fn remove_all(&mut self) -> Result<()> {
        self.contents.auths.clear();
        self.save_to_file()
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.contents.auths.keys().cloned().collect())
    }
}

/// Default auth file location.
///
/// `REGISTRY_AUTH_FILE` wins, then `$XDG_RUNTIME_DIR/containers/auth.json`,
/// then the per-user config directory.
pub fn default_auth_file() -> PathBuf {
    if let Ok(path) = env::var("REGISTRY_AUTH_FILE") {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(runtime_dir) = dirs::runtime_dir() {
        return runtime_dir.join("containers").join("auth.json");
    }

    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("containers").join("auth.json")
    } else {
        PathBuf::from("auth.json")
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
