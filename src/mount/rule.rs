//! Wildcard mount rules.
//!
//! A rule such as `/gh/{user}` owns every path starting with its literal
//! prefix `/gh/`. The path segment after the prefix is substituted for the
//! placeholder in the rule's templates to synthesize a mount on the fly.

use super::{Content, MountPoint, MountTarget, VcsKind};

/// A templated mount with exactly one placeholder.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct WildcardRule {
    /// Configured path before the placeholder, e.g. `/gh/`
    pub prefix: String,

    /// Placeholder token including braces, e.g. `{user}`
    pub placeholder: String,

    /// Repository URL containing `placeholder`
    pub repo_template: String,

    /// Display template, may contain `placeholder`
    pub display_template: String,

    pub vcs: VcsKind,

    /// Effective `Cache-Control` max-age in seconds
    pub cache_max_age: u64,
}

impl WildcardRule {
    /// Synthesize the mount for `name` if this rule owns `path`.
    ///
    /// Returns the mount and the subpath after the dynamic segment.
    fn apply<'a>(&self, path: &'a str) -> Option<(MountPoint, &'a str)> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        let (name, subpath) = match rest.split_once('/') {
            Some((name, subpath)) => (name, subpath),
            None => (rest, ""),
        };
        if name.is_empty() {
            return None;
        }

        let mount = MountPoint {
            path: format!("{}{}", self.prefix, name),
            target: MountTarget::Content(Content {
                repo: self.repo_template.replace(&self.placeholder, name),
                vcs: self.vcs,
                display: self.display_template.replace(&self.placeholder, name),
            }),
            cache_max_age: self.cache_max_age,
        };
        Some((mount, subpath))
    }

    /// The configured rule key, e.g. `/gh/{user}`.
    pub fn pattern(&self) -> String {
        format!("{}{}", self.prefix, self.placeholder)
    }
}

/// Wildcard rules ordered by literal prefix.
///
/// The loader guarantees no prefix is a prefix of another, so at most one
/// rule can match any path.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<WildcardRule>,
}

impl RuleSet {
    pub fn new(mut rules: Vec<WildcardRule>) -> Self {
        rules.sort_by(|a, b| a.prefix.cmp(&b.prefix));
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WildcardRule> {
        self.rules.iter()
    }

    /// Resolve `path` against the rules.
    ///
    /// A single trailing `/` on `path` is ignored.
    pub fn find<'a>(&self, path: &'a str) -> Option<(MountPoint, &'a str)> {
        let path = path.strip_suffix('/').unwrap_or(path);
        self.rules.iter().find_map(|rule| rule.apply(path))
    }
}
