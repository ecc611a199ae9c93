//! Router configuration for the vanity server.
//!
//! # Route Structure
//!
//! ```text
//! /            - Index page, or the root mount if one is configured
//! /{*path}     - Mount resolution (metadata, redirect or 404)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vanity_server::mount::load_file;
//! use vanity_server::server::{create_router, RouterConfig};
//!
//! let table = load_file(Path::new("vanity.yaml"))?;
//! let router = create_router(table, RouterConfig::new());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{mount_handler, AppState};
use crate::mount::MountTable;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a router configuration with tracing enabled.
    pub fn new() -> Self {
        Self {
            enable_tracing: true,
        }
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router serving `table`.
///
/// `GET` and `HEAD` are answered on every path; other methods get
/// `405 Method Not Allowed`.
pub fn create_router(table: MountTable, config: RouterConfig) -> Router {
    let router = Router::new()
        .route("/", get(mount_handler))
        .route("/{*path}", get(mount_handler))
        .with_state(AppState::new(table));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// =============================================================================
// Tests
// =============================================================================
