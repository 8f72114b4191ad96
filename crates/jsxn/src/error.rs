//! Error types for rule resolution

/// Result type for resolver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for rule parsing and materialization
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A rule or option names a cardinality this resolver does not implement
    #[error("unsupported cardinality: {0:?} (expected single, multiple, text or none)")]
    UnsupportedCardinality(String),

    /// Two contributions resolved to the same key while strict keys are enabled
    #[error("ambiguous key {key:?} under element <{element}>; add a `multiple` rule or re-key one of them")]
    AmbiguousKey { key: String, element: String },

    /// A rule spec that cannot be turned into a rule
    #[error("invalid rule: {0}")]
    InvalidRule(String),

    /// JSON decoding or encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new unsupported cardinality error
    pub fn unsupported_cardinality<S: Into<String>>(word: S) -> Self {
        Error::UnsupportedCardinality(word.into())
    }

    /// Create a new ambiguous key error
    pub fn ambiguous_key<K: Into<String>, E: Into<String>>(key: K, element: E) -> Self {
        Error::AmbiguousKey {
            key: key.into(),
            element: element.into(),
        }
    }

    /// Create a new invalid rule error
    pub fn invalid_rule<S: Into<String>>(msg: S) -> Self {
        Error::InvalidRule(msg.into())
    }
}
