use libvessel::auth::{AuthFile, CredentialStore, LogoutOptions, RegistryAuthenticator};
use libvessel::image::LocalImageStore;
use libvessel::{
    Authenticator, Credentials, EngineMode, ImageFilter, ImageListOptions, ImageService,
    OptionalBool, SecurityContext, TlsVerification, VesselError,
};
use tokio_util::sync::CancellationToken;

#[test]
fn test_version_is_reported() {
    assert_eq!(libvessel::version(), env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_engine_mode_round_trips_through_display() {
    for mode in EngineMode::ALL {
        let parsed: EngineMode = mode.to_string().parse().unwrap();
        assert_eq!(parsed, mode);
    }
}

#[test]
fn test_tls_tri_state_is_preserved() {
    let security = SecurityContext::new(None, None, OptionalBool::Unset.into());
    assert_eq!(security.tls_verification, TlsVerification::Unset);

    let security = SecurityContext::new(None, None, OptionalBool::False.into());
    assert_eq!(security.tls_verification, TlsVerification::Skip);
}

#[test]
fn test_authenticator_is_object_safe() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auth.json");
    AuthFile::open(&path)
        .unwrap()
        .store("quay.io", &Credentials::basic("alice", "s3cret"))
        .unwrap();

    let authenticator: Box<dyn Authenticator> = Box::new(RegistryAuthenticator::new());
    let security = SecurityContext::new(Some(path.clone()), None, TlsVerification::Unset);
    authenticator
        .logout(security, &LogoutOptions::default(), Some("quay.io"))
        .unwrap();

    assert!(AuthFile::open(&path).unwrap().list().unwrap().is_empty());
}

#[test]
fn test_image_service_is_object_safe() {
    let dir = tempfile::tempdir().unwrap();
    let service: Box<dyn ImageService> = Box::new(LocalImageStore::new(dir.path()));

    let options = ImageListOptions {
        all: false,
        filters: vec![ImageFilter::parse("reference=alpine").unwrap()],
    };
    assert!(
        service
            .list(&CancellationToken::new(), &options)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_errors_render_messages() {
    let err = VesselError::authentication("not logged into quay.io", None);
    assert_eq!(err.to_string(), "Authentication error: not logged into quay.io");
}
