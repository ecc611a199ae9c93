//! # Vanity Server
//!
//! Serves vanity import paths for package tooling.
//!
//! A request for a configured path answers with `go-import` and `go-source`
//! meta tags telling the client where the real source repository lives.
//! Mounts can also redirect selected subpaths (asset downloads, for
//! instance) to another URL.
//!
//! ## Features
//!
//! - **Longest-prefix resolution**: the most specific static mount owns a path
//! - **Wildcard rules**: `/gh/{user}` style mounts synthesized per request
//! - **Redirects**: redirect-only mounts and marker-triggered redirects
//! - **Cache advice**: per-mount `Cache-Control` lifetimes
//!
//! ## Architecture
//!
//! - [`mount`] - Mount table, path index, wildcard rules and config loading
//! - [`server`] - Axum-based HTTP server, dispatch and page rendering
//! - [`config`] - CLI and process configuration
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use vanity_server::{create_router, parse_config, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let table = parse_config(
//!         "host: example.com\n\
//!          paths:\n  /portmidi:\n    repo: https://github.com/rakyll/portmidi\n",
//!     )
//!     .expect("valid configuration");
//!
//!     let router = create_router(table, RouterConfig::new());
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod mount;
pub mod server;

// Re-export commonly used types
pub use config::{CheckConfig, CheckOutputFormat, Cli, Command, ServeConfig};
pub use error::{ConfigError, RenderError};
pub use mount::{
    load_file, parse_config, Content, MountPoint, MountTable, MountTarget, PathIndex, Redirect,
    ResolvedMount, RuleSet, VcsKind, WildcardRule,
};
pub use server::{create_router, dispatch, AppState, Decision, RequestPath, RouterConfig};
