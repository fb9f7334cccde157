//! Error handling for Camwall

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config error (fatal at startup, e.g. empty camera list)
    #[error("Config error: {0}")]
    Config(String),

    /// Parse error (malformed event payload or mapping file)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Media backend error (handle creation, bind, play)
    #[error("Media error: {0}")]
    Media(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
