//! Engine execution modes.
//!
//! The CLI reaches the container engine either in-process or over a remote
//! connection. Commands declare which of the two they support, and the
//! command tree shown to the user is filtered by the mode that is active for
//! the current process.

use crate::error::{Result, VesselError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;


/// How the tool reaches the container engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// In-process engine access (ABI)
    Direct,
    /// Networked engine access through a service endpoint (tunnel)
    Remote,
}

impl EngineMode {
    /// Both modes, in declaration order.
    pub const ALL: [EngineMode; 2] = [EngineMode::Direct, EngineMode::Remote];

    /// Maps a "use the remote engine" switch onto a mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use libvessel::EngineMode;
    ///
    /// assert_eq!(EngineMode::from_remote(true), EngineMode::Remote);
    /// assert_eq!(EngineMode::from_remote(false), EngineMode::Direct);
    /// ```
    pub fn from_remote(remote: bool) -> Self {
        if remote { Self::Remote } else { Self::Direct }
    }

    /// Returns true for the networked mode.
    pub fn is_remote(self) -> bool {
        self == Self::Remote
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for EngineMode {
    type Err = VesselError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "direct" | "abi" | "local" => Ok(Self::Direct),
            "remote" | "tunnel" => Ok(Self::Remote),
            other => Err(VesselError::validation(format!(
                "unknown engine mode '{}': expected 'direct' or 'remote'",
                other
            ))),
        }
    }
}

/// Parses the loose boolean spellings accepted in environment variables.
///
/// Returns `None` for anything that is not a recognised boolean.
pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
