//! Integration tests for the HTTP client.
//!
//! These tests verify the fetch-and-save flow against mock HTTP servers.

use std::time::Duration;

use image_downloader_core::DuplicatePolicy;
use image_downloader_core::download::{DownloadError, HttpClient, SaveOutcome};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a mock server with an image endpoint.
async fn setup_mock_image(path_str: &str, content: &[u8]) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/png")
                .set_body_bytes(content.to_vec()),
        )
        .mount(&mock_server)
        .await;

    mock_server
}

fn client() -> HttpClient {
    HttpClient::new(Duration::from_secs(5)).expect("client should build")
}

#[tokio::test]
async fn test_download_full_flow_preserves_content() {
    let content = b"\x89PNG\r\n\x1a\n not really a png but bytes are bytes";
    let mock_server = setup_mock_image("/logo.png", content).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let target = temp_dir.path().join("logo.png");

    let result = client()
        .download(
            &format!("{}/logo.png", mock_server.uri()),
            &target,
            DuplicatePolicy::Skip,
            true,
        )
        .await;

    assert!(
        matches!(result, Ok(SaveOutcome::Saved { .. })),
        "Download should succeed: {result:?}"
    );
    let downloaded = std::fs::read(&target).expect("should read file");
    assert_eq!(downloaded, content, "Downloaded content should match original");
}

#[tokio::test]
async fn test_download_handles_404_gracefully() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let target = temp_dir.path().join("missing.jpg");
    let result = client()
        .download(
            &format!("{}/missing.jpg", mock_server.uri()),
            &target,
            DuplicatePolicy::Skip,
            true,
        )
        .await;

    match result {
        Err(DownloadError::HttpStatus { status, url }) => {
            assert_eq!(status, 404);
            assert!(url.contains("/missing.jpg"));
        }
        other => panic!("Expected HttpStatus(404), got: {other:?}"),
    }
    assert!(!target.exists(), "no file should be written for a 404");
}

#[tokio::test]
async fn test_download_follows_redirects() {
    let mock_server = setup_mock_image("/real.png", b"img").await;
    Mock::given(method("GET"))
        .and(path("/short"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/real.png", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let target = temp_dir.path().join("short");

    let result = client()
        .download(
            &format!("{}/short", mock_server.uri()),
            &target,
            DuplicatePolicy::Skip,
            true,
        )
        .await;

    assert!(matches!(result, Ok(SaveOutcome::Saved { bytes: 3, .. })), "got {result:?}");
}

#[tokio::test]
async fn test_download_overwrite_replaces_existing_bytes() {
    let mock_server = setup_mock_image("/cat.png", b"fresh").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let target = temp_dir.path().join("cat.png");
    std::fs::write(&target, b"stale").expect("should seed file");

    let result = client()
        .download(
            &format!("{}/cat.png", mock_server.uri()),
            &target,
            DuplicatePolicy::Overwrite,
            true,
        )
        .await;

    assert!(matches!(result, Ok(SaveOutcome::Saved { .. })), "got {result:?}");
    assert_eq!(std::fs::read(&target).expect("should read file"), b"fresh");
}

#[tokio::test]
async fn test_download_to_nonexistent_directory_fails() {
    let mock_server = setup_mock_image("/file.png", b"content").await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let target = temp_dir.path().join("does").join("not").join("exist.png");

    let result = client()
        .download(
            &format!("{}/file.png", mock_server.uri()),
            &target,
            DuplicatePolicy::Skip,
            true,
        )
        .await;

    assert!(
        matches!(result, Err(DownloadError::Io { .. })),
        "Expected IO error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_download_unresolvable_host_is_network_failure() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let target = temp_dir.path().join("y.jpg");

    let result = client()
        .download(
            "http://bad-host.invalid/y.jpg",
            &target,
            DuplicatePolicy::Skip,
            true,
        )
        .await;

    assert!(
        matches!(
            result,
            Err(DownloadError::Network { .. } | DownloadError::Timeout { .. })
        ),
        "Expected network failure, got: {result:?}"
    );
    assert!(!target.exists());
}

#[tokio::test]
async fn test_download_client_is_reusable() {
    let mock_server = setup_mock_image("/one.png", b"one").await;
    Mock::given(method("GET"))
        .and(path("/two.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/png")
                .set_body_bytes(b"two".to_vec()),
        )
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let client = client();

    for name in ["one.png", "two.png"] {
        let target = temp_dir.path().join(name);
        let result = client
            .download(
                &format!("{}/{name}", mock_server.uri()),
                &target,
                DuplicatePolicy::Skip,
                true,
            )
            .await;
        assert!(result.is_ok(), "{name}: {result:?}");
    }

    assert_eq!(std::fs::read(temp_dir.path().join("one.png")).unwrap(), b"one");
    assert_eq!(std::fs::read(temp_dir.path().join("two.png")).unwrap(), b"two");
}
