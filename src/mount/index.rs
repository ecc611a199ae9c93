//! Longest-prefix index over static mounts.
//!
//! Mounts are kept sorted by path. Lookup runs in two phases:
//!
//! - **Fast path**: one binary search. An exact hit wins outright, and if the
//!   entry sorted immediately before the request path is a separator-delimited
//!   prefix of it, that entry is the most specific match. Any longer prefix
//!   would sort between the two.
//! - **Slow path**: lexicographic order does not imply containment when
//!   mounts nest (`/`, `/y` and `/example/helloworld` side by side), so the
//!   remaining candidates that sort before the request path are scanned and
//!   the longest prefix wins.

use super::MountPoint;

/// Sorted collection of static mounts.
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    mounts: Vec<MountPoint>,
}

impl PathIndex {
    /// Build an index, sorting the mounts by path.
    ///
    /// Paths must already be canonical and unique; the loader guarantees both.
    pub fn new(mut mounts: Vec<MountPoint>) -> Self {
        mounts.sort_by(|a, b| a.path.cmp(&b.path));
        Self { mounts }
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Mounts in path order.
    pub fn iter(&self) -> impl Iterator<Item = &MountPoint> {
        self.mounts.iter()
    }

    /// The mount configured at exactly `path`.
    pub fn get(&self, path: &str) -> Option<&MountPoint> {
        self.mounts
            .binary_search_by(|m| m.path.as_str().cmp(path))
            .ok()
            .map(|i| &self.mounts[i])
    }

    /// Find the most specific mount owning `path` and the remaining subpath.
    ///
    /// A single trailing `/` on `path` is ignored.
    pub fn find<'a>(&'a self, path: &'a str) -> Option<(&'a MountPoint, &'a str)> {
        let path = path.strip_suffix('/').unwrap_or(path);

        // Everything at or after `i` sorts >= path and cannot be a proper prefix.
        let i = self.mounts.partition_point(|m| m.path.as_str() < path);

        if let Some(mount) = self.mounts.get(i) {
            if mount.path == path {
                return Some((mount, ""));
            }
        }

        if i > 0 {
            let mount = &self.mounts[i - 1];
            if let Some(subpath) = subpath_of(path, &mount.path) {
                return Some((mount, subpath));
            }
        }

        let mut best: Option<(&MountPoint, &str)> = None;
        for mount in &self.mounts[..i] {
            if mount.path.len() >= path.len() {
                continue;
            }
            let Some(subpath) = subpath_of(path, &mount.path) else {
                continue;
            };
            if best.map_or(true, |(_, s)| subpath.len() < s.len()) {
                best = Some((mount, subpath));
            }
        }
        best
    }
}

/// The part of `path` after `mount` and a separator, if `mount` owns `path`.
fn subpath_of<'a>(path: &'a str, mount: &str) -> Option<&'a str> {
    path.strip_prefix(mount)?.strip_prefix('/')
}
