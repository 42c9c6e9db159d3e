//! Stub collaborators for command tests.

use crate::config::Config;
use crate::context::AppContext;
use chrono::{TimeZone, Utc};
use libvessel::auth::{LoginOptions, LogoutOptions};
use libvessel::image::{ImageListOptions, ImageSummary};
use libvessel::{Authenticator, EngineMode, ImageService, SecurityContext, VesselError};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// A call received by [`RecordingAuthenticator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    Login {
        security: SecurityContext,
        options: LoginOptions,
        server: String,
    },
    Logout {
        security: SecurityContext,
        options: LogoutOptions,
        server: Option<String>,
    },
}

/// Records every call and answers with a fixed result.
#[derive(Debug, Default)]
pub struct RecordingAuthenticator {
    calls: Mutex<Vec<AuthCall>>,
    failure: Option<String>,
}

impl RecordingAuthenticator {
    /// Fails every call with an authentication error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: AuthCall) -> libvessel::Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(VesselError::authentication(message.clone(), None)),
            None => Ok(()),
        }
    }
}

impl Authenticator for RecordingAuthenticator {
    fn login(
        &self,
        _cancel: &CancellationToken,
        security: SecurityContext,
        options: &LoginOptions,
        server: &str,
    ) -> libvessel::Result<()> {
        self.answer(AuthCall::Login {
            security,
            options: options.clone(),
            server: server.to_string(),
        })
    }

    fn logout(
        &self,
        security: SecurityContext,
        options: &LogoutOptions,
        server: Option<&str>,
    ) -> libvessel::Result<()> {
        self.answer(AuthCall::Logout {
            security,
            options: options.clone(),
            server: server.map(str::to_string),
        })
    }
}

/// Serves a fixed set of images, applying the requested filters.
#[derive(Debug, Default)]
pub struct StubImages {
    pub images: Vec<ImageSummary>,
    pub requests: Mutex<Vec<ImageListOptions>>,
}

impl ImageService for StubImages {
    fn list(
        &self,
        _cancel: &CancellationToken,
        options: &ImageListOptions,
    ) -> libvessel::Result<Vec<ImageSummary>> {
        self.requests.lock().unwrap().push(options.clone());
        Ok(self
            .images
            .iter()
            .filter(|image| options.accepts(image))
            .cloned()
            .collect())
    }
}

pub fn image(id: &str, repository: &str, tag: &str, day: u32, size: u64) -> ImageSummary {
    ImageSummary {
        id: format!("sha256:{}", id),
        repository: repository.to_string(),
        tag: tag.to_string(),
        digest: Some(format!("sha256:d{}", &id[1..])),
        created: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
        size,
        intermediate: false,
    }
}

pub fn sample_images() -> Vec<ImageSummary> {
    vec![
        image(
            "aaaaaaaaaaaa1111111111111111111111111111111111111111111111111111",
            "docker.io/library/alpine",
            "3.19",
            2,
            7_340_032,
        ),
        image(
            "bbbbbbbbbbbb2222222222222222222222222222222222222222222222222222",
            "quay.io/podman/hello",
            "latest",
            5,
            1_024,
        ),
        image(
            "aaaaaaaaaaaa1111111111111111111111111111111111111111111111111111",
            "docker.io/library/alpine",
            "latest",
            2,
            7_340_032,
        ),
        image(
            "cccccccccccc3333333333333333333333333333333333333333333333333333",
            "<none>",
            "<none>",
            1,
            2_048,
        ),
    ]
}

pub fn context(
    images: Arc<StubImages>,
    authenticator: Arc<RecordingAuthenticator>,
) -> AppContext {
    AppContext::with_services(Config::default(), EngineMode::Direct, images, authenticator)
}
