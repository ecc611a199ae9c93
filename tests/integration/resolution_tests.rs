//! Path resolution tests.
//!
//! Tests verify:
//! - Longest-prefix selection among nested mounts
//! - Segment boundaries and trailing slashes
//! - Wildcard rules and their precedence below static mounts
//! - Root mounts and percent-decoded paths

use axum::http::StatusCode;

use super::test_utils::{get, router};

const NESTED: &str = r#"
host: example.com
paths:
  /a:
    repo: https://github.com/acme/a
  /a/b:
    repo: https://github.com/acme/ab
  /a-b:
    repo: https://github.com/acme/a-dash-b
"#;

const RULES: &str = r#"
host: example.com
paths:
  /gh/special:
    repo: https://git.example.org/special
    vcs: git
pathrules:
  "/gh/{user}":
    repo: "https://github.com/{user}/tool"
"#;

// =============================================================================
// Longest Prefix
// =============================================================================

#[tokio::test]
async fn test_longest_prefix_wins() {
    let response = get(router(NESTED), "/a/b/c").await;
    assert_eq!(
        response.meta("go-import"),
        Some("example.com/a/b git https://github.com/acme/ab")
    );
}

#[tokio::test]
async fn test_shorter_mount_owns_sibling_subpaths() {
    let response = get(router(NESTED), "/a/c/d").await;
    assert_eq!(
        response.meta("go-import"),
        Some("example.com/a git https://github.com/acme/a")
    );
    assert!(response
        .body
        .contains("url=https://pkg.go.dev/example.com/a/c/d"));
}

#[tokio::test]
async fn test_dash_sibling_resolves_to_itself() {
    // "/a-b" sorts between "/a" and "/a/b".
    let response = get(router(NESTED), "/a-b/x").await;
    assert_eq!(
        response.meta("go-import"),
        Some("example.com/a-b git https://github.com/acme/a-dash-b")
    );
}

#[tokio::test]
async fn test_prefix_respects_segment_boundary() {
    let response = get(router(NESTED), "/abc").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trailing_slash_is_ignored() {
    let response = get(router(NESTED), "/a/b/").await;
    assert_eq!(
        response.meta("go-import"),
        Some("example.com/a/b git https://github.com/acme/ab")
    );
    assert!(response
        .body
        .contains(r#"<a href="https://pkg.go.dev/example.com/a/b">"#));
}

#[tokio::test]
async fn test_percent_encoded_path() {
    let response = get(router(NESTED), "/a%2Db/x").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.meta("go-import"),
        Some("example.com/a-b git https://github.com/acme/a-dash-b")
    );
}

// =============================================================================
// Wildcard Rules
// =============================================================================

#[tokio::test]
async fn test_wildcard_rule_synthesizes_mount() {
    let response = get(router(RULES), "/gh/acme/cmd/tool").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.meta("go-import"),
        Some("example.com/gh/acme git https://github.com/acme/tool")
    );
    assert_eq!(
        response.meta("go-source"),
        Some(
            "example.com/gh/acme https://github.com/acme/tool \
             https://github.com/acme/tool/tree/master{/dir} \
             https://github.com/acme/tool/blob/master{/dir}/{file}#L{line}"
        )
    );
    assert_eq!(
        response.header("cache-control"),
        Some("public, max-age=86400")
    );
}

#[tokio::test]
async fn test_static_mount_beats_wildcard() {
    let response = get(router(RULES), "/gh/special/pkg").await;
    assert_eq!(
        response.meta("go-import"),
        Some("example.com/gh/special git https://git.example.org/special")
    );
}

#[tokio::test]
async fn test_wildcard_needs_a_name() {
    let response = get(router(RULES), "/gh/").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = get(router(RULES), "/gh").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Root Mount
// =============================================================================

#[tokio::test]
async fn test_root_mount_owns_everything() {
    let config = "host: example.com\npaths:\n  /:\n    repo: https://github.com/acme/root\n";

    let response = get(router(config), "/").await;
    assert_eq!(
        response.meta("go-import"),
        Some("example.com git https://github.com/acme/root")
    );

    let response = get(router(config), "/sub/pkg").await;
    assert_eq!(
        response.meta("go-import"),
        Some("example.com git https://github.com/acme/root")
    );
    assert!(response
        .body
        .contains("url=https://pkg.go.dev/example.com/sub/pkg"));
}

#[tokio::test]
async fn test_root_mount_loses_to_longer_mount() {
    let config = "host: example.com\npaths:\n  /:\n    repo: https://github.com/acme/root\n  /x:\n    repo: https://github.com/acme/x\n";
    let response = get(router(config), "/x/y").await;
    assert_eq!(
        response.meta("go-import"),
        Some("example.com/x git https://github.com/acme/x")
    );
}
