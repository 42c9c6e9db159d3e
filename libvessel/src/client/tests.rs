use super::*;
use std::future::Future;

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

fn client_for(url: &str) -> Client {
    Client::new(url, &SecurityContext::default()).unwrap()
}

#[test]
fn test_client_defaults_to_https() {
    let client = client_for("registry.example.com");
    assert_eq!(client.registry_url(), "https://registry.example.com");
}

#[test]
fn test_client_keeps_explicit_http() {
    let client = client_for("http://localhost:5000");
    assert_eq!(client.registry_url(), "http://localhost:5000");
}

#[test]
fn test_client_removes_trailing_slashes() {
    let client = client_for("https://quay.io///");
    assert_eq!(client.registry_url(), "https://quay.io");
}

#[test]
fn test_client_rejects_empty_url() {
    let result = Client::new("   ", &SecurityContext::default());
    assert!(matches!(result, Err(VesselError::Validation { .. })));
}

#[test]
fn test_client_accepts_skip_verification() {
    let security = SecurityContext {
        tls_verification: TlsVerification::Skip,
        ..SecurityContext::default()
    };
    assert!(Client::new("https://localhost:5000", &security).is_ok());
}

#[test]
fn test_client_ignores_missing_cert_dir() {
    let temp = tempfile::tempdir().unwrap();
    let security = SecurityContext {
        cert_dir: Some(temp.path().join("does-not-exist")),
        ..SecurityContext::default()
    };
    assert!(Client::new("https://localhost:5000", &security).is_ok());
}

#[test]
fn test_load_certificates_rejects_invalid_pem() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("ca.crt"), "not a certificate").unwrap();
    std::fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

    let result = load_certificates(temp.path());
    assert!(matches!(result, Err(VesselError::Config { .. })));
}

#[test]
fn test_load_certificates_rejects_empty_bundle() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("ca.crt"), "").unwrap();

    let result = load_certificates(temp.path());
    assert!(matches!(result, Err(VesselError::Config { .. })));
}

#[test]
fn test_client_rejects_cert_dir_with_garbage() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("ca.crt"), "not a certificate").unwrap();
    let security = SecurityContext {
        cert_dir: Some(temp.path().to_path_buf()),
        ..SecurityContext::default()
    };

    let result = Client::new("https://localhost:5000", &security);
    assert!(matches!(result, Err(VesselError::Config { .. })));
}

#[test]
fn test_load_certificates_skips_other_extensions() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(temp.path().join("client.key"), "key material").unwrap();

    let certificates = load_certificates(temp.path()).unwrap();
    assert!(certificates.is_empty());
}

#[test]
fn test_client_config_builder_chaining() {
    let config = ClientConfig::new().with_timeout(120);
    assert_eq!(config.timeout_seconds, 120);
    assert_eq!(config.max_idle_per_host, 10);
}

#[test]
fn test_verify_credentials_open_registry() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/v2/").with_status(200).create();

    let client = client_for(&server.url());
    let creds = Credentials::basic("user", "pass");
    let result = block_on(client.verify_credentials(&creds));

    mock.assert();
    assert!(result.is_ok());
}

#[test]
fn test_verify_credentials_basic_challenge() {
    let mut server = mockito::Server::new();
    let expected_header = Credentials::basic("user", "pass")
        .to_header_value()
        .unwrap();

    let authorized = server
        .mock("GET", "/v2/")
        .match_header("authorization", expected_header.as_str())
        .with_status(200)
        .create();
    let challenge = server
        .mock("GET", "/v2/")
        .match_header("authorization", mockito::Matcher::Missing)
        .with_status(401)
        .with_header("WWW-Authenticate", r#"Basic realm="Registry""#)
        .create();

    let client = client_for(&server.url());
    let result = block_on(client.verify_credentials(&Credentials::basic("user", "pass")));

    challenge.assert();
    authorized.assert();
    assert!(result.is_ok());
}

#[test]
fn test_verify_credentials_basic_rejected() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("WWW-Authenticate", r#"Basic realm="Registry""#)
        .expect(2)
        .create();

    let client = client_for(&server.url());
    let result = block_on(client.verify_credentials(&Credentials::basic("user", "wrong")));

    assert!(matches!(
        result,
        Err(VesselError::Authentication {
            status_code: Some(401),
            ..
        })
    ));
}

#[test]
fn test_verify_credentials_bearer_token_flow() {
    let mut server = mockito::Server::new();
    let realm = format!("{}/token", server.url());

    let challenge = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header(
            "WWW-Authenticate",
            &format!(r#"Bearer realm="{}",service="registry.test""#, realm),
        )
        .create();
    let token = server
        .mock("GET", "/token")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("service".into(), "registry.test".into()),
            mockito::Matcher::UrlEncoded("account".into(), "user".into()),
        ]))
        .match_header("authorization", mockito::Matcher::Regex("^Basic ".into()))
        .with_status(200)
        .with_body(r#"{"token":"abc"}"#)
        .create();

    let client = client_for(&server.url());
    let result = block_on(client.verify_credentials(&Credentials::basic("user", "pass")));

    challenge.assert();
    token.assert();
    assert!(result.is_ok());
}

#[test]
fn test_verify_credentials_bearer_rejected() {
    let mut server = mockito::Server::new();
    let realm = format!("{}/token", server.url());

    let _challenge = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("WWW-Authenticate", &format!(r#"Bearer realm="{}""#, realm))
        .create();
    let _token = server
        .mock("GET", "/token")
        .match_query(mockito::Matcher::Any)
        .with_status(401)
        .create();

    let client = client_for(&server.url());
    let result = block_on(client.verify_credentials(&Credentials::basic("user", "bad")));

    assert!(result.unwrap_err().is_authentication());
}

#[test]
fn test_verify_credentials_unsupported_scheme() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/v2/")
        .with_status(401)
        .with_header("WWW-Authenticate", r#"Digest realm="Registry""#)
        .create();

    let client = client_for(&server.url());
    let result = block_on(client.verify_credentials(&Credentials::basic("user", "pass")));

    assert!(matches!(result, Err(VesselError::Validation { .. })));
}
