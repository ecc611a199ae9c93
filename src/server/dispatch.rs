//! Per-request dispatch decision.
//!
//! ```text
//! request path
//!     → static mounts (longest prefix)
//!     → wildcard rules
//!     ├─ matched, redirect applies   → Redirect (302)
//!     ├─ matched, has content        → Metadata (200 + Cache-Control)
//!     ├─ unmatched, path is "/"      → Index (200)
//!     └─ otherwise                   → NotFound (404)
//! ```
//!
//! A redirect applies when the mount is redirect-only, or when it also has
//! content and the subpath contains one of its redirect markers.

use std::borrow::Cow;

use crate::mount::{Content, MountPoint, MountTable, MountTarget, ResolvedMount};

/// The content side of a resolved mount, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTarget<'a> {
    pub path: Cow<'a, str>,
    pub content: Cow<'a, Content>,

    /// Subpath as it appeared in the request, still percent-encoded
    pub subpath: &'a str,
    pub cache_max_age: u64,
}

/// What to answer for a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision<'a> {
    /// Render go-import/go-source metadata
    Metadata(MetadataTarget<'a>),

    /// Redirect to the given location
    Redirect(String),

    /// Render the index of all mounts
    Index,

    NotFound,
}

/// Decide how to answer `path`.
pub fn dispatch<'a>(table: &'a MountTable, path: &'a RequestPath<'_>) -> Decision<'a> {
    match table.resolve(path.as_str()) {
        Some(resolved) => decide(path, resolved),
        None if path.as_str() == "/" => Decision::Index,
        None => Decision::NotFound,
    }
}

fn decide<'a>(path: &'a RequestPath<'_>, resolved: ResolvedMount<'a>) -> Decision<'a> {
    let raw_subpath = path.raw_subpath(resolved.subpath);

    let target = &resolved.mount.target;
    if let Some(redirect) = target.redirect() {
        if target.content().is_none() || redirect.matches(resolved.subpath) {
            return Decision::Redirect(redirect.location(raw_subpath));
        }
    }

    match metadata(resolved, raw_subpath) {
        Some(metadata) => Decision::Metadata(metadata),
        None => Decision::NotFound,
    }
}

fn metadata<'a>(resolved: ResolvedMount<'a>, subpath: &'a str) -> Option<MetadataTarget<'a>> {
    match resolved.mount {
        Cow::Borrowed(mount) => mount.target.content().map(|content| MetadataTarget {
            path: Cow::Borrowed(mount.path.as_str()),
            content: Cow::Borrowed(content),
            subpath,
            cache_max_age: mount.cache_max_age,
        }),
        Cow::Owned(MountPoint {
            path,
            target,
            cache_max_age,
        }) => match target {
            MountTarget::Content(content) | MountTarget::Both { content, .. } => {
                Some(MetadataTarget {
                    path: Cow::Owned(path),
                    content: Cow::Owned(content),
                    subpath,
                    cache_max_age,
                })
            }
            MountTarget::RedirectOnly(_) => None,
        },
    }
}

// =============================================================================
// Request Path
// =============================================================================

/// A request path normalized for resolution, tied to the raw text it came
/// from.
///
/// Resolution runs on the decoded form: percent-escapes are decoded (the raw
/// form is kept if it does not decode to UTF-8) and a leading `/` is added
/// when missing, which happens behind prefix-stripping proxies. Anything
/// echoed back to the client (redirect targets, documentation links) uses the
/// raw text so escapes such as `%2F` and `%20` survive.
#[derive(Debug, Clone)]
pub struct RequestPath<'a> {
    raw: &'a str,
    decoded: Cow<'a, str>,

    /// `decoded` is a percent-decoding of `raw`
    escaped: bool,

    /// Bytes prepended to `decoded` (the repaired leading `/`)
    shift: usize,
}

impl<'a> RequestPath<'a> {
    pub fn new(raw: &'a str) -> Self {
        let (decoded, escaped) = match urlencoding::decode(raw) {
            Ok(decoded) => (decoded, true),
            Err(_) => (Cow::Borrowed(raw), false),
        };
        let (decoded, shift) = if decoded.starts_with('/') {
            (decoded, 0)
        } else {
            (Cow::Owned(format!("/{decoded}")), 1)
        };
        Self {
            raw,
            decoded,
            escaped,
            shift,
        }
    }

    /// The decoded path.
    pub fn as_str(&self) -> &str {
        &self.decoded
    }

    /// The raw text of `subpath`, a resolved subpath of this path.
    ///
    /// Resolution ignores one trailing `/`, so `subpath` is a suffix of the
    /// decoded path with that separator removed.
    pub fn raw_subpath<'s>(&'s self, subpath: &'s str) -> &'s str {
        let end = self.decoded.strip_suffix('/').unwrap_or(&self.decoded).len();
        let start = end.saturating_sub(subpath.len());
        self.raw
            .get(self.raw_offset(start)..self.raw_offset(end))
            .unwrap_or(subpath)
    }

    /// Offset into `raw` of the byte at `offset` in the decoded path.
    fn raw_offset(&self, offset: usize) -> usize {
        let target = offset.saturating_sub(self.shift);
        if !self.escaped {
            return target.min(self.raw.len());
        }

        let bytes = self.raw.as_bytes();
        let (mut raw, mut decoded) = (0, 0);
        while decoded < target && raw < bytes.len() {
            raw += if is_escape(bytes, raw) { 3 } else { 1 };
            decoded += 1;
        }
        raw
    }
}

/// Whether a `%XX` escape starts at `i`.
fn is_escape(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'%'
        && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
        && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
}

/// `Cache-Control` value for a metadata response.
pub fn cache_control(max_age: u64) -> String {
    format!("public, max-age={max_age}")
}
