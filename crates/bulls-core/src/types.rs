use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session id assumed when a query arrives without one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Shown when the resolver declines to guess. Sent in the 422 body and
/// rendered by the client.
pub const NO_CONFIDENT_ANSWER_MESSAGE: &str =
    "I don't have a confident answer to that question yet. Try rephrasing it.";

// =============================================================================
// Conversation log
// =============================================================================

/// Author of a conversation entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Identifier of a conversation entry, assigned in creation order by its log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One immutable line of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: EntryId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Query / Answer
// =============================================================================

/// Answer confidence. Range: 0.0 (no confidence) to 1.0 (certain).
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(pub f64);

impl Confidence {
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }
}

/// A single user question as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub message: String,
    /// Opaque, passed through unchanged.
    pub session_id: String,
}

impl Query {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: DEFAULT_SESSION_ID.to_string(),
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }
}

/// The resolver's single response to one [`Query`].
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    /// Reference ids backing the answer, best first. Empty for canned answers.
    pub sources: Vec<String>,
    pub confidence: Option<Confidence>,
}

impl Answer {
    /// A fixed answer with no attribution.
    pub fn canned(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
            confidence: None,
        }
    }

    /// An answer composed from ranked knowledge-base passages.
    pub fn ranked(text: impl Into<String>, sources: Vec<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            sources,
            confidence: Some(Confidence::new(confidence)),
        }
    }
}

/// Coarse topic flags derived from a query's wording.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryIntent {
    pub needs_financial_data: bool,
    pub needs_news: bool,
    pub needs_technical: bool,
    pub needs_comparison: bool,
    pub needs_forecast: bool,
}

// =============================================================================
// Wire types (POST /api/chat)
// =============================================================================

/// Request body for `POST /api/chat`.
///
/// `message` is optional at the serde level so a missing field surfaces as
/// a validation error instead of an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            session_id: Some(session_id.into()),
        }
    }
}

/// Success body for `POST /api/chat`.
///
/// Only `response` is guaranteed; the rest is tolerated as absent so the
/// client can talk to minimal servers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<QueryIntent>,
}

impl ChatResponse {
    pub fn from_answer(answer: Answer, session_id: String, intent: QueryIntent) -> Self {
        Self {
            response: answer.text,
            session_id: Some(session_id),
            sources: answer.sources,
            confidence: answer.confidence.map(|c| c.0),
            intent: Some(intent),
        }
    }
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "low_confidence").
    pub error: String,
    /// Human-readable error message.
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_entry_ids_order_by_value() {
        assert!(EntryId(1) < EntryId(2));
        assert_eq!(EntryId(7).to_string(), "7");
    }

    #[test]
    fn test_confidence_clamps() {
        assert_eq!(Confidence::new(1.7).0, 1.0);
        assert_eq!(Confidence::new(-0.2).0, 0.0);
        assert_eq!(Confidence::new(f64::NAN).0, 0.0);
        assert_eq!(Confidence::new(0.42).0, 0.42);
    }

    #[test]
    fn test_query_defaults_session() {
        let q = Query::new("hello");
        assert_eq!(q.session_id, DEFAULT_SESSION_ID);
        let q = q.with_session("abc");
        assert_eq!(q.session_id, "abc");
    }

    #[test]
    fn test_chat_request_missing_fields_deserialize() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.message.is_none());
        assert!(req.session_id.is_none());
    }

    #[test]
    fn test_minimal_chat_response_deserializes() {
        let resp: ChatResponse = serde_json::from_str(r#"{"response":"hi"}"#).unwrap();
        assert_eq!(resp.response, "hi");
        assert!(resp.sources.is_empty());
        assert!(resp.confidence.is_none());
        assert!(resp.intent.is_none());
    }

    #[test]
    fn test_chat_response_omits_empty_extensions() {
        let resp = ChatResponse::from_answer(
            Answer::canned("fixed"),
            "s1".to_string(),
            QueryIntent::default(),
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["response"], "fixed");
        assert_eq!(json["session_id"], "s1");
        assert!(json.get("sources").is_none());
        assert!(json.get("confidence").is_none());
        assert_eq!(json["intent"]["needs_news"], false);
    }

    #[test]
    fn test_ranked_answer_carries_sources() {
        let resp = ChatResponse::from_answer(
            Answer::ranked("passage", vec!["kb/a".into(), "kb/b".into()], 0.8),
            "s".to_string(),
            QueryIntent::default(),
        );
        assert_eq!(resp.sources, vec!["kb/a", "kb/b"]);
        assert_eq!(resp.confidence, Some(0.8));
    }

    #[test]
    fn test_error_body_tolerates_bare_error() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"Failed to process message"}"#).unwrap();
        assert_eq!(body.error, "Failed to process message");
        assert!(body.message.is_empty());
    }
}
