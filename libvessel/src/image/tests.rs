use super::*;
use chrono::TimeZone;
use mockito::Matcher;

fn summary(repository: &str, tag: &str) -> ImageSummary {
    ImageSummary {
        id: "sha256:4b7ce07002c69e8f3d704a9c5d6fd3053be500b7f1c69fc0d80990c2ad8dd412".to_string(),
        repository: repository.to_string(),
        tag: tag.to_string(),
        digest: None,
        created: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        size: 7_340_032,
        intermediate: false,
    }
}

fn write_index(dir: &tempfile::TempDir, json: &str) {
    std::fs::write(dir.path().join("images.json"), json).unwrap();
}

const INDEX: &str = r#"[
  {
    "id": "sha256:aaaaaaaaaaaaaaaaaaaa",
    "names": ["docker.io/library/alpine:3.19", "docker.io/library/alpine:latest"],
    "digest": "sha256:dddd",
    "created": "2024-01-02T03:04:05Z",
    "size": 7340032
  },
  {
    "id": "sha256:bbbbbbbbbbbbbbbbbbbb",
    "names": [],
    "created": "2024-01-01T00:00:00Z",
    "size": 1024
  },
  {
    "id": "sha256:cccccccccccccccccccc",
    "created": "2024-01-01T00:00:00Z",
    "size": 10,
    "intermediate": true
  }
]"#;

#[test]
fn test_short_id_strips_prefix() {
    let image = summary("alpine", "3.19");
    assert_eq!(image.short_id(), "4b7ce07002c6");
    assert!(image.full_id().starts_with("4b7ce07002c6"));
}

#[test]
fn test_split_reference() {
    assert_eq!(
        split_reference("quay.io/team/app:1.0"),
        ("quay.io/team/app".to_string(), "1.0".to_string())
    );
    assert_eq!(
        split_reference("localhost:5000/app"),
        ("localhost:5000/app".to_string(), "latest".to_string())
    );
}

#[test]
fn test_filter_parse() {
    assert_eq!(
        ImageFilter::parse("reference=alpine*").unwrap(),
        ImageFilter::Reference("alpine*".to_string())
    );
    assert_eq!(
        ImageFilter::parse("dangling=false").unwrap(),
        ImageFilter::Dangling(false)
    );
    assert!(ImageFilter::parse("dangling=maybe").is_err());
    assert!(ImageFilter::parse("reference=").is_err());
    assert!(ImageFilter::parse("nonsense").is_err());
}

#[test]
fn test_reference_filter_wildcards() {
    let image = summary("docker.io/library/alpine", "3.19");

    assert!(ImageFilter::Reference("alpine".to_string()).matches(&image));
    assert!(ImageFilter::Reference("alp*".to_string()).matches(&image));
    assert!(ImageFilter::Reference("*/library/*:3.*".to_string()).matches(&image));
    assert!(ImageFilter::Reference("docker.io/library/alpine:3.19".to_string()).matches(&image));
    assert!(!ImageFilter::Reference("busybox*".to_string()).matches(&image));
    assert!(!ImageFilter::Reference("alpine:latest".to_string()).matches(&image));
}

#[test]
fn test_dangling_filter() {
    let dangling = summary(NONE_LABEL, NONE_LABEL);
    let tagged = summary("alpine", "3.19");

    assert!(ImageFilter::Dangling(true).matches(&dangling));
    assert!(!ImageFilter::Dangling(true).matches(&tagged));
    assert!(ImageFilter::Dangling(false).matches(&tagged));
    assert!(!ImageFilter::Reference("*".to_string()).matches(&dangling));
}

#[test]
fn test_wildcard_match() {
    assert!(wildcard_match("*", ""));
    assert!(wildcard_match("a*c", "abbbc"));
    assert!(wildcard_match("a*b*c", "aXbYbZc"));
    assert!(!wildcard_match("a*c", "abd"));
    assert!(!wildcard_match("abc", "abcd"));
}

#[test]
fn test_local_store_missing_index_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalImageStore::new(dir.path());

    let images = store
        .list(&CancellationToken::new(), &ImageListOptions::default())
        .unwrap();
    assert!(images.is_empty());
}

#[test]
fn test_local_store_lists_one_row_per_name() {
    let dir = tempfile::tempdir().unwrap();
    write_index(&dir, INDEX);

    let images = LocalImageStore::new(dir.path())
        .list(&CancellationToken::new(), &ImageListOptions::default())
        .unwrap();

    let references: Vec<String> = images.iter().map(|i| i.reference()).collect();
    assert_eq!(
        references,
        vec![
            "docker.io/library/alpine:3.19",
            "docker.io/library/alpine:latest",
            "<none>:<none>",
        ]
    );
    assert_eq!(images[0].digest.as_deref(), Some("sha256:dddd"));
}

#[test]
fn test_local_store_all_includes_intermediate() {
    let dir = tempfile::tempdir().unwrap();
    write_index(&dir, INDEX);

    let options = ImageListOptions {
        all: true,
        ..ImageListOptions::default()
    };
    let images = LocalImageStore::new(dir.path())
        .list(&CancellationToken::new(), &options)
        .unwrap();
    assert_eq!(images.len(), 4);
}

#[test]
fn test_local_store_applies_filters() {
    let dir = tempfile::tempdir().unwrap();
    write_index(&dir, INDEX);

    let options = ImageListOptions {
        all: false,
        filters: vec![ImageFilter::Dangling(true)],
    };
    let images = LocalImageStore::new(dir.path())
        .list(&CancellationToken::new(), &options)
        .unwrap();

    assert_eq!(images.len(), 1);
    assert!(images[0].is_dangling());
}

#[test]
fn test_local_store_malformed_index() {
    let dir = tempfile::tempdir().unwrap();
    write_index(&dir, "{");

    let result = LocalImageStore::new(dir.path())
        .list(&CancellationToken::new(), &ImageListOptions::default());
    assert!(matches!(result, Err(VesselError::Config { .. })));
}

#[test]
fn test_local_store_honours_cancellation() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = LocalImageStore::new(dir.path()).list(&cancel, &ImageListOptions::default());
    assert!(matches!(result, Err(VesselError::Cancelled)));
}

#[test]
fn test_tunnel_endpoint_keeps_base_path() {
    let service = TunnelImageService::new("https://engine.example.com/api").unwrap();
    assert_eq!(
        service.endpoint().as_str(),
        "https://engine.example.com/api/v4.0.0/libpod/images/json"
    );
}

#[test]
fn test_tunnel_lists_engine_images() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v4.0.0/libpod/images/json")
        .match_query(Matcher::UrlEncoded("all".into(), "false".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[
              {"Id": "aaaaaaaaaaaaaaaa", "RepoTags": ["quay.io/team/app:1.0"],
               "RepoDigests": ["quay.io/team/app@sha256:dddd"], "Created": 1704164645, "Size": 2048},
              {"Id": "bbbbbbbbbbbbbbbb", "RepoTags": null, "Created": 1704067200, "Size": 10}
            ]"#,
        )
        .create();

    let images = TunnelImageService::new(&server.url())
        .unwrap()
        .list(&CancellationToken::new(), &ImageListOptions::default())
        .unwrap();

    mock.assert();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].repository, "quay.io/team/app");
    assert_eq!(images[0].tag, "1.0");
    assert_eq!(images[0].digest.as_deref(), Some("sha256:dddd"));
    assert_eq!(
        images[0].created,
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    );
    assert!(images[1].is_dangling());
}

#[test]
fn test_tunnel_sends_filters_as_json() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v4.0.0/libpod/images/json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("all".into(), "true".into()),
            Matcher::UrlEncoded(
                "filters".into(),
                r#"{"dangling":["false"],"reference":["alpine*"]}"#.into(),
            ),
        ]))
        .with_status(200)
        .with_body("[]")
        .create();

    let options = ImageListOptions {
        all: true,
        filters: vec![
            ImageFilter::Reference("alpine*".to_string()),
            ImageFilter::Dangling(false),
        ],
    };
    let images = TunnelImageService::new(&server.url())
        .unwrap()
        .list(&CancellationToken::new(), &options)
        .unwrap();

    mock.assert();
    assert!(images.is_empty());
}

#[test]
fn test_tunnel_server_error() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/v4.0.0/libpod/images/json")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("storage is locked")
        .create();

    let result = TunnelImageService::new(&server.url())
        .unwrap()
        .list(&CancellationToken::new(), &ImageListOptions::default());

    assert!(matches!(
        result,
        Err(VesselError::Server {
            status_code: 500,
            ..
        })
    ));
}

#[test]
fn test_tunnel_rejects_malformed_body() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/v4.0.0/libpod/images/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create();

    let result = TunnelImageService::new(&server.url())
        .unwrap()
        .list(&CancellationToken::new(), &ImageListOptions::default());

    assert!(matches!(result, Err(VesselError::Validation { .. })));
}
