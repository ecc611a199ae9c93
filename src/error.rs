use thiserror::Error;

/// Errors raised while loading and validating the mount configuration.
///
/// All of these are fatal: the server refuses to start with a mount table
/// that failed validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("cannot read configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected schema
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// `vcs` is set to something other than git, hg, svn or bzr
    #[error("configuration for {key}: unknown VCS {vcs}")]
    UnknownVcs { key: String, vcs: String },

    /// `vcs` is empty and cannot be derived from the repository URL
    #[error("configuration for {key}: cannot infer VCS from {repo}")]
    CannotInferVcs { key: String, repo: String },

    /// A cache lifetime below zero
    #[error("configuration for {key}: cache_max_age is negative ({value})")]
    NegativeCacheAge { key: String, value: i64 },

    /// A static entry with neither `repo` nor `redir`
    #[error("configuration for {key}: neither repo nor redir is set")]
    MissingTarget { key: String },

    /// `redir_paths` without a `redir` target to send them to
    #[error("configuration for {key}: redir_paths set without redir")]
    MarkersWithoutRedirect { key: String },

    /// Two static entries normalize to the same mount path
    #[error("configuration for {key}: duplicate path {path}")]
    DuplicatePath { key: String, path: String },

    /// The `{placeholder}` of a wildcard rule is absent or malformed
    #[error("configuration for {key}: {reason} in {value:?}")]
    Placeholder {
        key: String,
        value: String,
        reason: &'static str,
    },

    /// Text after the placeholder in a wildcard rule key
    #[error("configuration for {key}: trailing text {suffix:?} after placeholder {placeholder:?}")]
    TrailingText {
        key: String,
        placeholder: String,
        suffix: String,
    },

    /// The rule key and its repository template use different placeholders
    #[error("configuration for {key}: placeholder in rule is {rule:?} but {repo:?} in repo")]
    PlaceholderMismatch {
        key: String,
        rule: String,
        repo: String,
    },

    /// Two wildcard rules share the same literal prefix
    #[error("configuration for {key}: duplicate prefix {prefix}")]
    DuplicateRulePrefix { key: String, prefix: String },

    /// One wildcard rule prefix is a prefix of another
    #[error("configuration for {covered} is already covered by {covering}")]
    AmbiguousRules { covered: String, covering: String },
}

/// A page template failed to render.
#[derive(Debug, Error)]
#[error("cannot render the {page} page")]
pub struct RenderError {
    pub page: &'static str,
    #[source]
    pub source: std::fmt::Error,
}

impl RenderError {
    pub fn new(page: &'static str, source: std::fmt::Error) -> Self {
        Self { page, source }
    }
}
