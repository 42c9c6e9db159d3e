//! Registry login and logout.

use crate::auth::{
    AuthFile, Authenticator, CredentialStore, Credentials, LoginOptions, LogoutOptions,
    SecurityContext,
};
use crate::client::{Client, ClientConfig, run_cancellable};
use crate::error::{Result, VesselError};
use std::io::{self, BufRead, Write};
use tokio_util::sync::CancellationToken;

/// A registry named on the command line.
///
/// `key` identifies the registry in the auth file; `url` is where the
/// credentials are verified. An explicit `http://` prefix is kept for the
/// URL so plain-HTTP development registries can be used; everything else is
/// contacted over HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryTarget {
    /// Auth file key, e.g. `quay.io` or `quay.io/team`
    pub key: String,
    /// Base URL of the registry API
    pub url: String,
}

impl RegistryTarget {
    /// Parses a registry argument.
    ///
    /// # Examples
    ///
    /// ```
    /// use libvessel::auth::RegistryTarget;
    ///
    /// let target = RegistryTarget::parse("https://quay.io/team/").unwrap();
    /// assert_eq!(target.key, "quay.io/team");
    /// assert_eq!(target.url, "https://quay.io");
    /// ```
    pub fn parse(server: &str) -> Result<Self> {
        let server = server.trim();

        let (scheme, rest) = if let Some(rest) = server.strip_prefix("http://") {
            ("http", rest)
        } else if let Some(rest) = server.strip_prefix("https://") {
            ("https", rest)
        } else {
            ("https", server)
        };

        let key = rest.trim_end_matches('/');
        if key.is_empty() {
            return Err(VesselError::validation("registry must be given"));
        }

        let host = key.split('/').next().unwrap_or(key);

        Ok(Self {
            key: key.to_string(),
            url: format!("{}://{}", scheme, host),
        })
    }
}

/// [`Authenticator`] that verifies credentials against the registry API and
/// keeps them in the auth file.
#[derive(Debug, Clone, Default)]
pub struct RegistryAuthenticator {
    config: ClientConfig,
}

impl RegistryAuthenticator {
    /// Creates an authenticator with default client settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an authenticator with custom client settings.
    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    fn report_login(file: &AuthFile, target: &RegistryTarget) -> Result<()> {
        match file.get(&target.key)? {
            Some(Credentials::Basic { username, .. }) => {
                println!("{}", username);
                Ok(())
            }
            _ => Err(VesselError::authentication(
                format!("not logged into {}", target.key),
                None,
            )),
        }
    }

    fn resolve_password(options: &LoginOptions) -> Result<String> {
        if options.password_stdin {
            return read_password_stdin();
        }
        if let Some(password) = &options.password {
            return Ok(password.clone());
        }
        let password = rpassword::prompt_password("Password: ")
            .map_err(|e| VesselError::validation_with_source("Failed to read password", e))?;
        if password.is_empty() {
            return Err(VesselError::validation("password required"));
        }
        Ok(password)
    }
}

impl Authenticator for RegistryAuthenticator {
    fn login(
        &self,
        cancel: &CancellationToken,
        security: SecurityContext,
        options: &LoginOptions,
        server: &str,
    ) -> Result<()> {
        let target = RegistryTarget::parse(server)?;
        let mut file = AuthFile::open(security.auth_file_path())?;

        if options.get_login {
            return Self::report_login(&file, &target);
        }

        if options.password.is_some() && options.password_stdin {
            return Err(VesselError::validation(
                "can't specify both --password-stdin and --password",
            ));
        }
        if options.password_stdin && options.username.is_none() {
            return Err(VesselError::validation(
                "must provide --username with --password-stdin",
            ));
        }

        tracing::debug!(
            registry = %target.key,
            auth_file = %file.path().display(),
            tls = ?security.tls_verification,
            "logging in"
        );

        let client = Client::with_config(&target.url, &security, self.config.clone())?;
        let stored = file.get(&target.key)?;

        let nothing_given =
            options.username.is_none() && options.password.is_none() && !options.password_stdin;
        if nothing_given {
            if let Some(existing) = &stored {
                println!("Authenticating with existing credentials for {}", target.key);
                match run_cancellable(cancel, client.verify_credentials(existing)) {
                    Ok(()) => {
                        println!(
                            "Existing credentials are valid. Already logged in to {}",
                            target.key
                        );
                        return Ok(());
                    }
                    Err(VesselError::Cancelled) => return Err(VesselError::Cancelled),
                    Err(e) => {
                        tracing::debug!(error = %e, "existing credentials rejected");
                        println!("Existing credentials are invalid, please enter valid username and password");
                    }
                }
            }
        }

        let username = match &options.username {
            Some(username) => username.clone(),
            None => prompt_username(stored.as_ref().and_then(|c| c.username()))?,
        };
        let password = Self::resolve_password(options)?;
        let credentials = Credentials::basic(username, password);

        run_cancellable(cancel, client.verify_credentials(&credentials)).map_err(|e| match e {
            VesselError::Authentication { status_code, .. } => VesselError::authentication(
                format!("logging into {:?}: invalid username/password", target.key),
                status_code,
            ),
            other => other,
        })?;

        file.store(&target.key, &credentials)?;
        println!("Login Succeeded!");
        Ok(())
    }

    fn logout(
        &self,
        security: SecurityContext,
        options: &LogoutOptions,
        server: Option<&str>,
    ) -> Result<()> {
        let mut file = AuthFile::open(security.auth_file_path())?;

        if options.all {
            file.remove_all()?;
            println!("Removed login credentials for all registries");
            return Ok(());
        }

        let server = server.ok_or_else(|| VesselError::validation("registry must be given"))?;
        let target = RegistryTarget::parse(server)?;

        if file.remove(&target.key)? {
            println!("Removed login credentials for {}", target.key);
            Ok(())
        } else {
            Err(VesselError::authentication(
                format!("not logged into {}", target.key),
                None,
            ))
        }
    }
}

fn prompt_username(stored: Option<&str>) -> Result<String> {
    match stored {
        Some(name) => print!("Username ({}): ", name),
        None => print!("Username: "),
    }
    io::stdout()
        .flush()
        .map_err(|e| VesselError::validation_with_source("Failed to flush stdout", e))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| VesselError::validation_with_source("Failed to read username", e))?;

    let username = line.trim();
    match (username.is_empty(), stored) {
        (false, _) => Ok(username.to_string()),
        (true, Some(name)) => Ok(name.to_string()),
        (true, None) => Err(VesselError::validation("username required")),
    }
}

fn read_password_stdin() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| VesselError::validation_with_source("Failed to read password from stdin", e))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
