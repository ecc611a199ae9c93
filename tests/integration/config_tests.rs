//! Configuration loading tests.
//!
//! Tests verify:
//! - Files load into a working router
//! - Invalid configurations are rejected before serving

use std::fs;
use std::path::PathBuf;

use axum::http::StatusCode;

use vanity_server::{create_router, load_file, parse_config, ConfigError, RouterConfig};

use super::test_utils::{get, PORTMIDI_CONFIG};

/// Write `contents` to a file unique to this test process.
fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "vanity-server-{}-{}.yaml",
        std::process::id(),
        name
    ));
    fs::write(&path, contents).unwrap();
    path
}

// =============================================================================
// Loading
// =============================================================================

#[tokio::test]
async fn test_load_file_serves_mounts() {
    let path = write_temp("serves", PORTMIDI_CONFIG);
    let table = load_file(&path).unwrap();
    fs::remove_file(&path).ok();

    let router = create_router(table, RouterConfig::new().with_tracing(false));
    let response = get(router, "/portmidi").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("vanity-server-does-not-exist.yaml");
    let err = load_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("vanity-server-does-not-exist.yaml"));
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn test_negative_global_cache_age() {
    let config = format!("cache_max_age: -1\n{}", PORTMIDI_CONFIG);
    assert!(matches!(
        parse_config(&config),
        Err(ConfigError::NegativeCacheAge { value: -1, .. })
    ));
}

#[test]
fn test_unknown_vcs() {
    let config = "paths:\n  /x:\n    repo: https://example.org/x\n    vcs: cvs\n";
    assert!(matches!(
        parse_config(config),
        Err(ConfigError::UnknownVcs { .. })
    ));
}

#[test]
fn test_vcs_required_off_github() {
    let config = "paths:\n  /x:\n    repo: https://example.org/x\n";
    assert!(matches!(
        parse_config(config),
        Err(ConfigError::CannotInferVcs { .. })
    ));
}

#[test]
fn test_ambiguous_rules() {
    let config = r#"
pathrules:
  "/gh/{user}":
    repo: "https://github.com/{user}"
  "/gh/x/{user}":
    repo: "https://github.com/{user}"
"#;
    assert!(matches!(
        parse_config(config),
        Err(ConfigError::AmbiguousRules { .. })
    ));
}

#[test]
fn test_unknown_top_level_key() {
    let config = format!("{}pathz: {{}}\n", PORTMIDI_CONFIG);
    assert!(matches!(parse_config(&config), Err(ConfigError::Parse(_))));
}
