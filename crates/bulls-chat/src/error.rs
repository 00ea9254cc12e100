//! Error types for answer resolution.

/// Errors from the answer resolver.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat is disabled")]
    Disabled,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("no answer cleared the relevance threshold")]
    LowConfidence,
}
