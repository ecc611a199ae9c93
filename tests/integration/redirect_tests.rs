//! Redirect tests.
//!
//! Tests verify:
//! - Redirect-only mounts answer 302 for every subpath
//! - Marker subpaths take precedence over metadata
//! - `Location` joins target and subpath with a single slash

use axum::http::StatusCode;

use super::test_utils::{get, router};

const CONFIG: &str = r#"
host: example.com
paths:
  /docs:
    redir: https://docs.example.org/
  /tool:
    repo: https://github.com/acme/tool
    redir: https://downloads.example.org/tool
    redir_paths:
      - releases
      - "archive/"
"#;

// =============================================================================
// Redirect-Only Mounts
// =============================================================================

#[tokio::test]
async fn test_redirect_only_mount_root() {
    let response = get(router(CONFIG), "/docs").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        Some("https://docs.example.org/")
    );
}

#[tokio::test]
async fn test_redirect_only_mount_subpath() {
    let response = get(router(CONFIG), "/docs/guide/intro").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        Some("https://docs.example.org/guide/intro")
    );
    assert!(response.header("cache-control").is_none());
}

// =============================================================================
// Marker Redirects
// =============================================================================

#[tokio::test]
async fn test_marker_subpath_redirects() {
    let response = get(router(CONFIG), "/tool/releases/v1.0.tar.gz").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        Some("https://downloads.example.org/tool/releases/v1.0.tar.gz")
    );
}

#[tokio::test]
async fn test_second_marker_redirects() {
    let response = get(router(CONFIG), "/tool/archive/old").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        Some("https://downloads.example.org/tool/archive/old")
    );
}

#[tokio::test]
async fn test_unmarked_subpath_serves_metadata() {
    let response = get(router(CONFIG), "/tool/cmd/tool").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.meta("go-import"),
        Some("example.com/tool git https://github.com/acme/tool")
    );
}

#[tokio::test]
async fn test_mount_root_with_content_serves_metadata() {
    let response = get(router(CONFIG), "/tool").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.meta("go-import").is_some());
}

#[tokio::test]
async fn test_marker_matches_anywhere_in_subpath() {
    // Markers match as substrings, so a package named after one redirects too.
    let response = get(router(CONFIG), "/tool/prereleases").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        Some("https://downloads.example.org/tool/prereleases")
    );
}

#[tokio::test]
async fn test_redirect_ignores_host_header() {
    use super::test_utils::get_with_host;

    let response = get_with_host(router(CONFIG), "/docs/x", Some("vanity.test")).await;
    assert_eq!(
        response.header("location"),
        Some("https://docs.example.org/x")
    );
}

// =============================================================================
// Escaped Subpaths
// =============================================================================

#[tokio::test]
async fn test_location_keeps_subpath_escapes() {
    let cases = [
        ("/docs/a%20b", "https://docs.example.org/a%20b"),
        ("/docs/a%2Fb", "https://docs.example.org/a%2Fb"),
        ("/docs/x%0Ay", "https://docs.example.org/x%0Ay"),
        ("/docs/a%20b/", "https://docs.example.org/a%20b"),
    ];
    for (uri, expected) in cases {
        let response = get(router(CONFIG), uri).await;
        assert_eq!(response.status, StatusCode::FOUND, "{uri}");
        assert_eq!(response.header("location"), Some(expected), "{uri}");
    }
}

#[tokio::test]
async fn test_escaped_marker_still_redirects() {
    let response = get(router(CONFIG), "/tool/releases/v1%2B2.tar.gz").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(
        response.header("location"),
        Some("https://downloads.example.org/tool/releases/v1%2B2.tar.gz")
    );
}
