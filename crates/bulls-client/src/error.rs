use thiserror::Error;

/// Why a dispatched query did not produce a server answer.
///
/// None of these reach the conversation log; the dispatcher replaces them
/// with a fixed assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Connection refused, DNS failure, timeout, or a dropped body.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Non-success status other than a low-confidence decline.
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Server answered 422 `low_confidence`.
    #[error("No confident answer: {0}")]
    LowConfidence(String),

    /// The transport panicked; the detail is logged, never shown.
    #[error("Internal transport failure: {0}")]
    Internal(String),

    #[error("Client configuration error: {0}")]
    Config(String),
}
