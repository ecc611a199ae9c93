//! Test utilities for integration tests.
//!
//! Builds routers from inline YAML and issues requests through
//! `tower::ServiceExt::oneshot`, so no sockets are involved.

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vanity_server::{create_router, parse_config, RouterConfig};

/// The configuration used by the end-to-end scenarios.
pub const PORTMIDI_CONFIG: &str = "host: example.com\n\
paths:\n  /portmidi:\n    repo: https://github.com/rakyll/portmidi\n";

/// A response reduced to what the tests inspect.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Content of `<meta name="{name}" content="...">`, if present.
    pub fn meta(&self, name: &str) -> Option<&str> {
        find_meta(&self.body, name)
    }
}

/// Build a router from YAML configuration, with tracing off.
pub fn router(config: &str) -> Router {
    let table = parse_config(config).expect("test configuration should be valid");
    create_router(table, RouterConfig::new().with_tracing(false))
}

/// GET `uri` with an optional `Host` header.
pub async fn get_with_host(router: Router, uri: &str, host: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().uri(uri);
    if let Some(host) = host {
        builder = builder.header("host", host);
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// GET `uri` without a `Host` header.
pub async fn get(router: Router, uri: &str) -> TestResponse {
    get_with_host(router, uri, None).await
}

/// Extract a meta tag's content attribute from an HTML document.
pub fn find_meta<'a>(html: &'a str, name: &str) -> Option<&'a str> {
    let marker = format!(r#"<meta name="{}" content=""#, name);
    let start = html.find(&marker)? + marker.len();
    let end = html[start..].find('"')?;
    Some(&html[start..start + end])
}
