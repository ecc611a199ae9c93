//! Mount table: the path-resolution core.
//!
//! A mount is a configured path prefix that owns every request path below it.
//! The table is built once from configuration and never mutated afterwards,
//! so it can be shared across request tasks behind an `Arc` without locks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          YAML configuration             │
//! └────────────────────┬────────────────────┘
//!                      │ loader (validate, infer, normalize)
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │              MountTable                 │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │  PathIndex   │  │    RuleSet      │  │
//! │  │ (static,     │  │ (wildcard,      │  │
//! │  │  sorted)     │  │  by prefix)     │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │ resolve(path)
//!                      ▼
//!               ResolvedMount<'_>
//! ```

mod index;
mod loader;
mod rule;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

pub use index::PathIndex;
pub use loader::{
    load_file, parse_config, RawConfig, RawPath, RawPathRule, DEFAULT_CACHE_MAX_AGE,
    DEFAULT_DOCS_URL,
};
pub use rule::{RuleSet, WildcardRule};

// =============================================================================
// VCS Kind
// =============================================================================

/// Version control system announced to client tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    Git,
    Hg,
    Svn,
    Bzr,
}

impl VcsKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VcsKind::Git => "git",
            VcsKind::Hg => "hg",
            VcsKind::Svn => "svn",
            VcsKind::Bzr => "bzr",
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VcsKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "git" => Ok(VcsKind::Git),
            "hg" => Ok(VcsKind::Hg),
            "svn" => Ok(VcsKind::Svn),
            "bzr" => Ok(VcsKind::Bzr),
            _ => Err(()),
        }
    }
}

// =============================================================================
// Mount Point
// =============================================================================

/// Where the source of a mount lives.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Content {
    /// Repository URL handed to the client
    pub repo: String,

    /// Version control system of `repo`
    pub vcs: VcsKind,

    /// Source-browsing template with `{dir}`, `{file}` and `{line}` holes
    pub display: String,
}

/// Redirect settings of a mount.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Redirect {
    /// Base URL the subpath is appended to
    pub target: String,

    /// Subpath substrings that trigger the redirect on content mounts
    pub markers: Vec<String>,
}

impl Redirect {
    /// Whether `subpath` contains any of the redirect markers.
    ///
    /// This is a plain substring test: a marker `v1` also fires on
    /// `docs/v10/index`.
    pub fn matches(&self, subpath: &str) -> bool {
        self.markers
            .iter()
            .any(|marker| !marker.is_empty() && subpath.contains(marker.as_str()))
    }

    /// Build the `Location` for `subpath`.
    pub fn location(&self, subpath: &str) -> String {
        if subpath.is_empty() {
            return self.target.clone();
        }
        if self.target.ends_with('/') {
            format!("{}{}", self.target, subpath)
        } else {
            format!("{}/{}", self.target, subpath)
        }
    }
}

/// What a mount serves. A mount always has content, a redirect, or both.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MountTarget {
    Content(Content),
    RedirectOnly(Redirect),
    Both { content: Content, redirect: Redirect },
}

impl MountTarget {
    pub fn content(&self) -> Option<&Content> {
        match self {
            MountTarget::Content(content) | MountTarget::Both { content, .. } => Some(content),
            MountTarget::RedirectOnly(_) => None,
        }
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            MountTarget::RedirectOnly(redirect) | MountTarget::Both { redirect, .. } => {
                Some(redirect)
            }
            MountTarget::Content(_) => None,
        }
    }
}

/// A configured static mount, or one synthesized from a wildcard rule.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MountPoint {
    /// Canonical path without trailing separator (the root mount is `""`)
    pub path: String,

    pub target: MountTarget,

    /// Effective `Cache-Control` max-age in seconds
    pub cache_max_age: u64,
}

// =============================================================================
// Resolution
// =============================================================================

/// The outcome of resolving a request path against the mount table.
///
/// Static matches borrow from the table; wildcard matches own the mount they
/// synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMount<'a> {
    pub mount: Cow<'a, MountPoint>,

    /// Request path remainder after the mount path, without leading `/`
    pub subpath: &'a str,
}

/// The validated, immutable set of mounts.
#[derive(Debug, Clone)]
pub struct MountTable {
    host: Option<String>,
    docs_url: String,
    paths: PathIndex,
    rules: RuleSet,
}

impl MountTable {
    pub fn new(host: Option<String>, docs_url: String, paths: PathIndex, rules: RuleSet) -> Self {
        Self {
            host: host.filter(|h| !h.is_empty()),
            docs_url,
            paths,
            rules,
        }
    }

    /// Configured host override, if any.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Documentation site used for browser links.
    pub fn docs_url(&self) -> &str {
        &self.docs_url
    }

    pub fn paths(&self) -> &PathIndex {
        &self.paths
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Resolve `path` to the mount owning it.
    ///
    /// Static mounts are consulted first; wildcard rules only when no static
    /// mount owns the path.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Option<ResolvedMount<'a>> {
        if let Some((mount, subpath)) = self.paths.find(path) {
            return Some(ResolvedMount {
                mount: Cow::Borrowed(mount),
                subpath,
            });
        }

        self.rules
            .find(path)
            .map(|(mount, subpath)| ResolvedMount {
                mount: Cow::Owned(mount),
                subpath,
            })
    }
}
