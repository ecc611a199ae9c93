//! HTTP request handlers for the vanity server.
//!
//! Every request path goes through one handler, which resolves the path
//! against the mount table and turns the [`Decision`] into a response.
//!
//! # Responses
//!
//! - `200 OK`: metadata page (with `Cache-Control`) or index page
//! - `302 Found`: redirect for redirect-only mounts and marked subpaths
//! - `404 Not Found`: no mount owns the path
//! - `500 Internal Server Error`: a page failed to render

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, error};

use crate::error::RenderError;
use crate::mount::MountTable;

use super::dispatch::{cache_control, dispatch, Decision, RequestPath};
use super::render::{render_index, render_metadata, IndexPage, IndexRule, MetadataPage};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the mount table.
///
/// The table is immutable, so handlers read it without synchronization.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<MountTable>,
}

impl AppState {
    pub fn new(table: MountTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Wrapper for handler errors to implement IntoResponse.
#[derive(Debug)]
pub struct HandlerError(pub RenderError);

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        error!(
            status = StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            "Server error: {}", self.0
        );
        (StatusCode::INTERNAL_SERVER_ERROR, "cannot render the page").into_response()
    }
}

impl From<RenderError> for HandlerError {
    fn from(err: RenderError) -> Self {
        HandlerError(err)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// The host used in import paths.
///
/// The configured override wins; otherwise the request's `Host` header, then
/// the URI authority (HTTP/2 requests carry `:authority` instead).
pub fn resolve_host<'a>(table: &'a MountTable, headers: &'a HeaderMap, uri: &'a Uri) -> &'a str {
    if let Some(host) = table.host() {
        return host;
    }
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("")
}

/// Whether the request carries the `go-get=1` tooling marker.
fn is_go_get(uri: &Uri) -> bool {
    uri.query()
        .map(|q| q.split('&').any(|pair| pair == "go-get=1"))
        .unwrap_or(false)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle every mount request.
///
/// # Endpoint
///
/// `GET /{*path}`
///
/// # Headers
///
/// - `Cache-Control: public, max-age={cache_max_age}` on metadata pages
/// - `Location` on redirects
pub async fn mount_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, HandlerError> {
    let table = state.table.as_ref();
    let path = RequestPath::new(uri.path());
    let go_get = is_go_get(&uri);

    match dispatch(table, &path) {
        Decision::Metadata(target) => {
            debug!(
                path = path.as_str(),
                mount = %target.path,
                subpath = target.subpath,
                go_get,
                "Serving metadata"
            );
            let page = MetadataPage {
                host: resolve_host(table, &headers, &uri),
                path: &target.path,
                vcs: target.content.vcs,
                repo: &target.content.repo,
                display: &target.content.display,
                subpath: target.subpath,
                docs_url: table.docs_url(),
            };
            let html = render_metadata(&page)?;
            Ok((
                [(header::CACHE_CONTROL, cache_control(target.cache_max_age))],
                Html(html),
            )
                .into_response())
        }
        Decision::Redirect(location) => {
            debug!(path = path.as_str(), location = %location, go_get, "Redirecting");
            Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
        }
        Decision::Index => {
            debug!(go_get, "Serving index");
            let page = IndexPage {
                host: resolve_host(table, &headers, &uri),
                docs_url: table.docs_url(),
                paths: table.paths().iter().map(|m| m.path.as_str()).collect(),
                rules: table
                    .rules()
                    .iter()
                    .map(|r| IndexRule {
                        pattern: r.pattern(),
                        repo: &r.repo_template,
                    })
                    .collect(),
            };
            Ok(Html(render_index(&page)?).into_response())
        }
        Decision::NotFound => {
            debug!(path = path.as_str(), go_get, "No mount for path");
            Ok(not_found())
        }
    }
}
