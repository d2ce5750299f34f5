use thiserror::Error;

/// Top-level error type for the Banter system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for BanterError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BanterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rule load error: {0}")]
    Rules(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Audio cue error: {0}")]
    Cue(String),

    #[error("Animation error: {0}")]
    Animation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for BanterError {
    fn from(err: toml::de::Error) -> Self {
        BanterError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BanterError {
    fn from(err: toml::ser::Error) -> Self {
        BanterError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BanterError {
    fn from(err: serde_json::Error) -> Self {
        BanterError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Banter operations.
pub type Result<T> = std::result::Result<T, BanterError>;
