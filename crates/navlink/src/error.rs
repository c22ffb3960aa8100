//! Error types for config compilation and loading
//!
//! Only construction-time failures are errors. A path that matches nothing or
//! a state that cannot be expressed as a navigate action is an ordinary
//! `Option` / `RESET` result.

/// Errors raised while loading or compiling a linking config
#[derive(Debug, thiserror::Error)]
pub enum LinkingError {
    /// `exact: true` was set on a screen that has no `path`
    #[error(
        "a 'path' needs to be specified for screen '{screen}' when specifying 'exact: true'; \
         to keep this screen out of the URL, specify it as an empty string"
    )]
    ExactWithoutPath { screen: String },

    /// Two unrelated screen chains compile to the same pattern
    #[error(
        "found conflicting screens with the same pattern: the pattern '{pattern}' resolves to \
         both '{first}' and '{second}'; patterns must be unique and cannot resolve to more than \
         one screen"
    )]
    DuplicatePattern {
        pattern: String,
        first: String,
        second: String,
    },

    /// A pattern (usually an inline parameter regex) failed to compile
    #[error("invalid pattern '{pattern}' for screen '{screen}': {source}")]
    InvalidPattern {
        screen: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Structurally valid input that the validator rejects
    #[error("invalid linking config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse JSON linking config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML linking config: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, LinkingError>;
