//! HTTP client for container registry authentication checks.
//!
//! This is a thin reqwest wrapper that knows how to ping the `/v2/` endpoint
//! of a registry and how to prove a set of credentials against it, following
//! the registry's `WWW-Authenticate` challenge (Basic or Bearer token realm).
//! TLS behaviour comes from the caller's [`SecurityContext`].

use crate::auth::{AuthChallenge, Credentials, SecurityContext, TlsVerification};
use crate::error::{Result, VesselError};
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Certificate, Client as ReqwestClient, Response, StatusCode};
use std::fs;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod tests;

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libvessel::client::ClientConfig;
///
/// let config = ClientConfig::new().with_timeout(60);
/// assert_eq!(config.timeout_seconds, 60);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// Maximum idle connections per host (default: 10)
    pub max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_idle_per_host: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// HTTP client for a single registry.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: ReqwestClient,
    registry_url: String,
    timeout_seconds: u64,
}

impl Client {
    /// Creates a client for `registry_url` honouring the TLS settings of `security`.
    ///
    /// A URL without a scheme is contacted over HTTPS.
    ///
    /// # Examples
    ///
    /// ```
    /// use libvessel::auth::SecurityContext;
    /// use libvessel::client::Client;
    ///
    /// let client = Client::new("quay.io", &SecurityContext::default()).unwrap();
    /// assert_eq!(client.registry_url(), "https://quay.io");
    /// ```
    pub fn new(registry_url: &str, security: &SecurityContext) -> Result<Self> {
        Self::with_config(registry_url, security, ClientConfig::default())
    }

    /// Creates a client with a custom configuration.
    pub fn with_config(
        registry_url: &str,
        security: &SecurityContext,
        config: ClientConfig,
    ) -> Result<Self> {
        let normalized_url = Self::normalize_url(registry_url)?;

        let mut builder = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(config.max_idle_per_host);

        if security.tls_verification == TlsVerification::Skip {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(cert_dir) = &security.cert_dir {
            for certificate in load_certificates(cert_dir)? {
                builder = builder.add_root_certificate(certificate);
            }
        }

        let http_client = builder
            .build()
            .map_err(|e| VesselError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url: normalized_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Normalizes a registry URL: default https scheme, no trailing slashes.
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(VesselError::validation("Registry URL cannot be empty"));
        }

        let url = if !url.starts_with("http://") && !url.starts_with("https://") {
            format!("https://{}", url)
        } else {
            url.to_string()
        };

        Ok(url.trim_end_matches('/').to_string())
    }

    /// Returns the base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Proves `credentials` against the registry.
    ///
    /// An anonymous `/v2/` request is sent first. A registry that answers it
    /// successfully needs no login and the credentials are accepted as-is.
    /// On 401 the challenge decides the next step: Basic registries are asked
    /// again with an Authorization header, Bearer registries have their token
    /// realm queried with the credentials.
    ///
    /// # Errors
    ///
    /// Returns [`VesselError::Authentication`] when the registry rejects the
    /// credentials, and network/server errors as they occur.
    pub async fn verify_credentials(&self, credentials: &Credentials) -> Result<()> {
        let response = self.get_v2(None).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            Self::check_response_status(response).await?;
            return Ok(());
        }

        let challenge = response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .map(AuthChallenge::parse)
            .transpose()?;

        match challenge {
            Some(challenge) if challenge.scheme.eq_ignore_ascii_case("bearer") => {
                self.request_token(&challenge, credentials).await
            }
            Some(challenge) if !challenge.scheme.eq_ignore_ascii_case("basic") => {
                Err(VesselError::validation(format!(
                    "Unsupported authentication scheme '{}' from {}",
                    challenge.scheme, self.registry_url
                )))
            }
            _ => {
                let response = self.get_v2(Some(credentials)).await?;
                Self::check_response_status(response).await?;
                Ok(())
            }
        }
    }

    /// Requests a token from a Bearer realm using Basic credentials.
    async fn request_token(
        &self,
        challenge: &AuthChallenge,
        credentials: &Credentials,
    ) -> Result<()> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(service) = &challenge.service {
            query.push(("service", service.as_str()));
        }
        if let Some(scope) = &challenge.scope {
            query.push(("scope", scope.as_str()));
        }
        if let Some(username) = credentials.username() {
            query.push(("account", username));
        }

        let mut request = self.http_client.get(&challenge.realm).query(&query);
        if let Some(header) = credentials.to_header_value() {
            request = request.header(AUTHORIZATION, header);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, &challenge.realm))?;

        Self::check_response_status(response).await?;
        Ok(())
    }

    async fn get_v2(&self, credentials: Option<&Credentials>) -> Result<Response> {
        let url = format!("{}/v2/", self.registry_url);
        let mut request = self.http_client.get(&url);

        if let Some(header) = credentials.and_then(|c| c.to_header_value()) {
            request = request.header(AUTHORIZATION, header);
        }

        request
            .send()
            .await
            .map_err(|e| self.translate_reqwest_error(e, &self.registry_url))
    }

    fn translate_reqwest_error(&self, error: reqwest::Error, target: &str) -> VesselError {
        translate_reqwest_error(error, target, self.timeout_seconds)
    }

    /// Checks the HTTP response status and translates failures to VesselError.
    pub(crate) async fn check_response_status(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("(unable to read response body)"));

        match status {
            StatusCode::UNAUTHORIZED => Err(VesselError::authentication(
                format!("Authentication required for {}: {}", url, error_body),
                Some(401),
            )),
            StatusCode::FORBIDDEN => Err(VesselError::authentication(
                format!("Access forbidden for {}: {}", url, error_body),
                Some(403),
            )),
            StatusCode::NOT_FOUND => Err(VesselError::not_found("endpoint", url.as_str())),
            StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => Err(VesselError::server(
                format!("Server error from {}: {}", url, error_body),
                status.as_u16(),
            )),
            _ => Err(VesselError::network(format!(
                "HTTP {} from {}: {}",
                status.as_u16(),
                url,
                error_body
            ))),
        }
    }
}

/// Translates a reqwest error into a VesselError.
pub(crate) fn translate_reqwest_error(
    error: reqwest::Error,
    target: &str,
    timeout_seconds: u64,
) -> VesselError {
    if error.is_timeout() {
        VesselError::network(format!(
            "Request to {} timed out after {} seconds",
            target, timeout_seconds
        ))
    } else if error.is_connect() {
        VesselError::network_with_source(format!("Failed to connect to {}", target), error)
    } else {
        VesselError::network_with_source(
            format!("Network error communicating with {}", target),
            error,
        )
    }
}

/// Drives `future` to completion on a private runtime.
///
/// Cancelling `cancel`, or pressing Ctrl-C, abandons the request.
pub(crate) fn run_cancellable<F, T>(cancel: &CancellationToken, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| VesselError::network_with_source("Failed to start async runtime", e))?;

    runtime.block_on(async {
        let interrupted = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::debug!(error = %e, "cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(VesselError::Cancelled),
            _ = interrupted => {
                cancel.cancel();
                Err(VesselError::Cancelled)
            }
            result = future => result,
        }
    })
}

/// Loads every `*.crt` file in `dir` as an extra trusted root.
///
/// A missing directory contributes no certificates.
pub fn load_certificates(dir: &Path) -> Result<Vec<Certificate>> {
    if !dir.exists() {
        tracing::debug!(path = %dir.display(), "certificate directory does not exist");
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| {
        VesselError::config_with_source(
            "Failed to read certificate directory",
            dir.to_str(),
            e,
        )
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "crt"))
        .collect();
    paths.sort();

    let mut certificates = Vec::with_capacity(paths.len());
    for path in paths {
        let pem = fs::read(&path).map_err(|e| {
            VesselError::config_with_source("Failed to read certificate", path.to_str(), e)
        })?;
        let bundle = Certificate::from_pem_bundle(&pem).map_err(|e| {
            VesselError::config_with_source("Invalid PEM certificate", path.to_str(), e)
        })?;
        if bundle.is_empty() {
            return Err(VesselError::config(
                "No PEM certificate found",
                path.to_str(),
            ));
        }
        tracing::debug!(
            path = %path.display(),
            count = bundle.len(),
            "loaded registry certificates"
        );
        certificates.extend(bundle);
    }

    Ok(certificates)
}
