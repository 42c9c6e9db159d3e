//! Registry authentication.
//!
//! The command layer assembles a [`SecurityContext`] and a set of
//! [`LoginOptions`] from its flags and hands both to an [`Authenticator`].
//! Everything past that point (prompting, verifying credentials against the
//! registry, persisting them in the auth file) belongs to the authenticator.

use crate::error::{Result, VesselError};
use crate::tristate::OptionalBool;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

mod login;
mod store;

pub use login::{RegistryAuthenticator, RegistryTarget};
pub use store::{AuthFile, CredentialStore, default_auth_file};


/// Credentials for registry authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication
    Anonymous,

    /// HTTP Basic authentication with username and password
    Basic {
        /// Username for authentication
        username: String,
        /// Password for authentication
        password: String,
    },
}

impl Credentials {
    /// Creates Basic authentication credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libvessel::auth::Credentials;
    ///
    /// let creds = Credentials::basic("username", "password");
    /// assert_eq!(creds.username(), Some("username"));
    /// ```
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username, if any.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Basic { username, .. } => Some(username),
        }
    }

    /// Returns the Authorization header value for these credentials.
    pub fn to_header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Basic { username, password } => {
                use base64::{Engine as _, engine::general_purpose};
                let encoded = general_purpose::STANDARD.encode(format!("{}:{}", username, password));
                Some(format!("Basic {}", encoded))
            }
        }
    }
}

/// Information parsed from a WWW-Authenticate header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChallenge {
    /// The authentication scheme (e.g., "Bearer")
    pub scheme: String,

    /// The authentication realm
    pub realm: String,

    /// The service identifier
    pub service: Option<String>,

    /// The scope being requested
    pub scope: Option<String>,
}

impl AuthChallenge {
    /// Parses a WWW-Authenticate header value.
    ///
    /// # Examples
    ///
    /// ```
    /// use libvessel::auth::AuthChallenge;
    ///
    /// let header = r#"Bearer realm="https://auth.example.com/token",service="registry""#;
    /// let challenge = AuthChallenge::parse(header).unwrap();
    /// assert_eq!(challenge.scheme, "Bearer");
    /// ```
    pub fn parse(header: &str) -> Result<Self> {
        let header = header.trim();

        let (scheme, params) = header
            .split_once(' ')
            .ok_or_else(|| VesselError::validation("Invalid WWW-Authenticate header format"))?;

        let mut realm = None;
        let mut service = None;
        let mut scope = None;

        for param in params.split(',') {
            if let Some((key, value)) = param.trim().split_once('=') {
                let value = value.trim().trim_matches('"').to_string();
                match key.trim() {
                    "realm" => realm = Some(value),
                    "service" => service = Some(value),
                    "scope" => scope = Some(value),
                    _ => {}
                }
            }
        }

        let realm = realm.ok_or_else(|| {
            VesselError::validation("WWW-Authenticate header missing required 'realm' parameter")
        })?;

        Ok(Self {
            scheme: scheme.to_string(),
            realm,
            service,
            scope,
        })
    }
}

/// Whether TLS certificates are verified when contacting a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsVerification {
    /// No preference was expressed; the collaborator's default applies
    #[default]
    Unset,
    /// Certificates must be verified
    Require,
    /// Certificate verification is skipped
    Skip,
}

impl From<OptionalBool> for TlsVerification {
    /// Maps an explicit `--tls-verify` value onto a verification policy.
    fn from(verify: OptionalBool) -> Self {
        match verify {
            OptionalBool::Unset => Self::Unset,
            OptionalBool::True => Self::Require,
            OptionalBool::False => Self::Skip,
        }
    }
}

/// Credential and TLS parameters for a single invocation.
///
/// Built fresh for each command and moved into the authenticator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    /// Credential (auth) file; `None` uses [`default_auth_file`]
    pub auth_file: Option<PathBuf>,
    /// Directory holding extra `*.crt` roots for registry TLS
    pub cert_dir: Option<PathBuf>,
    /// Certificate verification policy
    pub tls_verification: TlsVerification,
}

impl SecurityContext {
    /// Creates a security context.
    pub fn new(
        auth_file: Option<PathBuf>,
        cert_dir: Option<PathBuf>,
        tls_verification: TlsVerification,
    ) -> Self {
        Self {
            auth_file,
            cert_dir,
            tls_verification,
        }
    }

    /// Returns the auth file to use, falling back to the default location.
    pub fn auth_file_path(&self) -> PathBuf {
        self.auth_file.clone().unwrap_or_else(default_auth_file)
    }
}

/// Options understood by [`Authenticator::login`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginOptions {
    /// Path of the auth file
    pub auth_file: Option<PathBuf>,
    /// Directory with registry certificates
    pub cert_dir: Option<PathBuf>,
    /// Username; prompted for when absent
    pub username: Option<String>,
    /// Password; prompted for when absent
    pub password: Option<String>,
    /// Read the password from standard input
    pub password_stdin: bool,
    /// Only report the user currently logged in
    pub get_login: bool,
}

/// Options understood by [`Authenticator::logout`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogoutOptions {
    /// Path of the auth file
    pub auth_file: Option<PathBuf>,
    /// Remove the credentials of every registry
    pub all: bool,
}

/// Logs in to and out of container registries.
pub trait Authenticator: Send + Sync {
    /// Logs in to `server`.
    ///
    /// The `cancel` token aborts any network activity still in flight.
    fn login(
        &self,
        cancel: &CancellationToken,
        security: SecurityContext,
        options: &LoginOptions,
        server: &str,
    ) -> Result<()>;

    /// Removes stored credentials for `server`, or for every registry when
    /// `options.all` is set.
    fn logout(
        &self,
        security: SecurityContext,
        options: &LogoutOptions,
        server: Option<&str>,
    ) -> Result<()>;
}
