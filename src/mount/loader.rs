//! Configuration loading and validation.
//!
//! The YAML file is deserialized into [`RawConfig`], a direct image of the
//! file. [`RawConfig::build`] then normalizes paths, infers missing VCS and
//! display values, resolves cache lifetimes and rejects anything that would
//! make resolution ambiguous. The result is an immutable [`MountTable`].
//!
//! # Example
//!
//! ```
//! use vanity_server::mount::parse_config;
//!
//! let table = parse_config(
//!     "host: example.com\n\
//!      paths:\n  /portmidi:\n    repo: https://github.com/rakyll/portmidi\n",
//! )
//! .unwrap();
//!
//! let resolved = table.resolve("/portmidi/sub").unwrap();
//! assert_eq!(resolved.mount.path, "/portmidi");
//! assert_eq!(resolved.subpath, "sub");
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::ConfigError;

use super::{
    Content, MountPoint, MountTable, MountTarget, PathIndex, Redirect, RuleSet, VcsKind,
    WildcardRule,
};

/// Cache lifetime used when neither the entry nor the file sets one (24 hours).
pub const DEFAULT_CACHE_MAX_AGE: u64 = 86400;

/// Documentation site linked from rendered pages.
pub const DEFAULT_DOCS_URL: &str = "https://pkg.go.dev";

// =============================================================================
// Raw Schema
// =============================================================================

/// The configuration file as written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Host used in import paths instead of the request `Host` header
    #[serde(default)]
    pub host: Option<String>,

    /// Default cache lifetime in seconds
    #[serde(default)]
    pub cache_max_age: Option<i64>,

    /// Documentation site base URL
    #[serde(default)]
    pub docs_url: Option<String>,

    /// Static mounts keyed by path
    #[serde(default)]
    pub paths: BTreeMap<String, RawPath>,

    /// Wildcard rules keyed by templated path
    #[serde(default)]
    pub pathrules: BTreeMap<String, RawPathRule>,
}

/// One static mount entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawPath {
    pub repo: String,
    pub display: String,
    pub vcs: String,
    pub redir: String,
    pub redir_paths: Vec<String>,
    pub cache_max_age: Option<i64>,
}

/// One wildcard rule entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawPathRule {
    pub repo: String,
    pub display: String,
    pub vcs: String,
}

// =============================================================================
// Entry Points
// =============================================================================

/// Parse and validate YAML configuration text.
pub fn parse_config(text: &str) -> Result<MountTable, ConfigError> {
    let raw: RawConfig = serde_yaml::from_str(text)?;
    raw.build()
}

/// Read, parse and validate a configuration file.
pub fn load_file(path: &Path) -> Result<MountTable, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&text)
}

impl RawConfig {
    /// Validate and normalize into an immutable mount table.
    pub fn build(self) -> Result<MountTable, ConfigError> {
        let default_age = match self.cache_max_age {
            Some(value) => non_negative("cache_max_age", value)?,
            None => DEFAULT_CACHE_MAX_AGE,
        };

        let mut seen = HashSet::new();
        let mut mounts = Vec::with_capacity(self.paths.len());
        for (key, entry) in &self.paths {
            let mount = build_mount(key, entry, default_age)?;
            if !seen.insert(mount.path.clone()) {
                return Err(ConfigError::DuplicatePath {
                    key: key.clone(),
                    path: mount.path,
                });
            }
            debug!(path = %mount.path, "Loaded mount");
            mounts.push(mount);
        }

        let mut rules: Vec<WildcardRule> = Vec::with_capacity(self.pathrules.len());
        for (key, entry) in &self.pathrules {
            let rule = build_rule(key, entry, default_age)?;
            if rules.iter().any(|r| r.prefix == rule.prefix) {
                return Err(ConfigError::DuplicateRulePrefix {
                    key: key.clone(),
                    prefix: rule.prefix,
                });
            }
            debug!(rule = %rule.pattern(), "Loaded wildcard rule");
            rules.push(rule);
        }
        check_ambiguity(&rules)?;

        let docs_url = self
            .docs_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_DOCS_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(MountTable::new(
            self.host,
            docs_url,
            PathIndex::new(mounts),
            RuleSet::new(rules),
        ))
    }
}

// =============================================================================
// Static Mounts
// =============================================================================

fn build_mount(key: &str, entry: &RawPath, default_age: u64) -> Result<MountPoint, ConfigError> {
    let cache_max_age = match entry.cache_max_age {
        Some(value) => non_negative(key, value)?,
        None => default_age,
    };

    if entry.redir.is_empty() && !entry.redir_paths.is_empty() {
        return Err(ConfigError::MarkersWithoutRedirect {
            key: key.to_string(),
        });
    }
    let redirect = (!entry.redir.is_empty()).then(|| Redirect {
        target: entry.redir.clone(),
        markers: entry.redir_paths.clone(),
    });

    let content = if entry.repo.is_empty() {
        // Redirect-only mounts announce no VCS, but a typo is still an error.
        if !entry.vcs.is_empty() {
            parse_vcs(key, &entry.vcs)?;
        }
        None
    } else {
        Some(Content {
            repo: entry.repo.clone(),
            vcs: resolve_vcs(key, &entry.vcs, &entry.repo)?,
            display: resolve_display(&entry.display, &entry.repo),
        })
    };

    let target = match (content, redirect) {
        (Some(content), Some(redirect)) => MountTarget::Both { content, redirect },
        (Some(content), None) => MountTarget::Content(content),
        (None, Some(redirect)) => MountTarget::RedirectOnly(redirect),
        (None, None) => {
            return Err(ConfigError::MissingTarget {
                key: key.to_string(),
            })
        }
    };

    Ok(MountPoint {
        path: canonical_path(key),
        target,
        cache_max_age,
    })
}

/// Mount path for a configuration key: one trailing `/` dropped and a
/// leading `/` added when missing. The root key `/` becomes `""`.
fn canonical_path(key: &str) -> String {
    let path = key.strip_suffix('/').unwrap_or(key);
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn non_negative(key: &str, value: i64) -> Result<u64, ConfigError> {
    u64::try_from(value).map_err(|_| ConfigError::NegativeCacheAge {
        key: key.to_string(),
        value,
    })
}

fn parse_vcs(key: &str, vcs: &str) -> Result<VcsKind, ConfigError> {
    vcs.parse().map_err(|_| ConfigError::UnknownVcs {
        key: key.to_string(),
        vcs: vcs.to_string(),
    })
}

fn resolve_vcs(key: &str, vcs: &str, repo: &str) -> Result<VcsKind, ConfigError> {
    if !vcs.is_empty() {
        return parse_vcs(key, vcs);
    }
    if hosted_on(repo, "github.com") {
        return Ok(VcsKind::Git);
    }
    Err(ConfigError::CannotInferVcs {
        key: key.to_string(),
        repo: repo.to_string(),
    })
}

fn resolve_display(display: &str, repo: &str) -> String {
    if !display.is_empty() {
        return display.to_string();
    }
    if hosted_on(repo, "github.com") {
        format!("{repo} {repo}/tree/master{{/dir}} {repo}/blob/master{{/dir}}/{{file}}#L{{line}}")
    } else if hosted_on(repo, "bitbucket.org") {
        format!("{repo} {repo}/src/default{{/dir}} {repo}/src/default{{/dir}}/{{file}}#{{file}}-{{line}}")
    } else {
        String::new()
    }
}

/// Whether `repo` is an https URL on `host`.
fn hosted_on(repo: &str, host: &str) -> bool {
    Url::parse(repo)
        .map(|url| url.scheme() == "https" && url.host_str() == Some(host))
        .unwrap_or(false)
}

// =============================================================================
// Wildcard Rules
// =============================================================================

/// A value split around its single `{placeholder}`.
struct Structure<'a> {
    prefix: &'a str,
    placeholder: &'a str,
    suffix: &'a str,
}

fn find_structure<'a>(key: &str, value: &'a str) -> Result<Structure<'a>, ConfigError> {
    let fail = |reason| ConfigError::Placeholder {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };

    let open = value.find('{').ok_or_else(|| fail("no placeholder found"))?;
    let close = value[open..]
        .find('}')
        .map(|i| open + i)
        .ok_or_else(|| fail("placeholder not terminated"))?;
    if close == open + 1 {
        return Err(fail("placeholder is empty"));
    }
    let suffix = &value[close + 1..];
    if suffix.contains(['{', '}']) {
        return Err(fail("multiple placeholders and only one allowed"));
    }

    Ok(Structure {
        prefix: &value[..open],
        placeholder: &value[open..=close],
        suffix,
    })
}

fn build_rule(
    key: &str,
    entry: &RawPathRule,
    cache_max_age: u64,
) -> Result<WildcardRule, ConfigError> {
    let rule = find_structure(key, key.strip_suffix('/').unwrap_or(key))?;
    if !rule.suffix.is_empty() {
        return Err(ConfigError::TrailingText {
            key: key.to_string(),
            placeholder: rule.placeholder.to_string(),
            suffix: rule.suffix.to_string(),
        });
    }

    let repo = find_structure(key, entry.repo.strip_suffix('/').unwrap_or(&entry.repo))?;
    if rule.placeholder != repo.placeholder {
        return Err(ConfigError::PlaceholderMismatch {
            key: key.to_string(),
            rule: rule.placeholder.to_string(),
            repo: repo.placeholder.to_string(),
        });
    }

    let prefix = if rule.prefix.starts_with('/') {
        rule.prefix.to_string()
    } else {
        format!("/{}", rule.prefix)
    };

    Ok(WildcardRule {
        prefix,
        placeholder: rule.placeholder.to_string(),
        repo_template: entry.repo.clone(),
        display_template: resolve_display(&entry.display, &entry.repo),
        vcs: resolve_vcs(key, &entry.vcs, &entry.repo)?,
        cache_max_age,
    })
}

/// Reject any rule whose prefix starts with another rule's prefix.
fn check_ambiguity(rules: &[WildcardRule]) -> Result<(), ConfigError> {
    for (i, covering) in rules.iter().enumerate() {
        for (j, covered) in rules.iter().enumerate() {
            if i != j && covered.prefix.starts_with(&covering.prefix) {
                return Err(ConfigError::AmbiguousRules {
                    covered: covered.pattern(),
                    covering: covering.pattern(),
                });
            }
        }
    }
    Ok(())
}
