//! HTTP server layer for the vanity server.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                       GET /{*path}                              │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌────────────┐  ┌─────────┐  │
//! │  │  handlers   │  │  dispatch   │  │   render   │  │ routes  │  │
//! │  │ (requests)  │  │ (decision)  │  │  (pages)   │  │ (router)│  │
//! │  └─────────────┘  └─────────────┘  └────────────┘  └─────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod dispatch;
pub mod handlers;
pub mod render;
pub mod routes;

pub use dispatch::{cache_control, dispatch, Decision, MetadataTarget, RequestPath};
pub use handlers::{mount_handler, resolve_host, AppState, HandlerError};
pub use render::{render_index, render_metadata, IndexPage, IndexRule, MetadataPage};
pub use routes::{create_router, RouterConfig};
