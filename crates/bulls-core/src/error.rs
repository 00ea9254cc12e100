use thiserror::Error;

/// Top-level error type shared by the BullsAI crates.
///
/// Subsystem crates keep their own error enums (`ChatError`, `DispatchError`,
/// `ApiError`) and convert into or out of `BullsError` at crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BullsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for BullsError {
    fn from(err: toml::de::Error) -> Self {
        BullsError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for BullsError {
    fn from(err: toml::ser::Error) -> Self {
        BullsError::Config(err.to_string())
    }
}

/// A specialized `Result` type for BullsAI operations.
pub type Result<T> = std::result::Result<T, BullsError>;
