//! Error types for the roxmltree adapter

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Parsing or resolution failure
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// XML parsing failed
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// Rule resolution failed
    #[error(transparent)]
    Resolve(#[from] jsxn::Error),
}
