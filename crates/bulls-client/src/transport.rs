//! Outbound transport for chat queries.
//!
//! [`ChatTransport`] is the seam between the dispatcher and the network;
//! [`HttpTransport`] talks to `POST /api/chat` with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use bulls_core::config::ClientConfig;
use bulls_core::{ChatRequest, ChatResponse, ErrorBody};

use crate::error::DispatchError;

/// Sends one chat request and returns the server's answer.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, DispatchError>;
}

/// HTTP transport against a BullsAI backend.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, DispatchError> {
        if config.timeout_secs == 0 {
            return Err(DispatchError::Config(
                "client.timeout_secs must be at least 1".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DispatchError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", config.api_base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, DispatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| DispatchError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| DispatchError::UpstreamUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let parsed: ChatResponse = serde_json::from_slice(&body)
            .map_err(|e| DispatchError::MalformedResponse(e.to_string()))?;
        if parsed.response.trim().is_empty() {
            return Err(DispatchError::MalformedResponse(
                "empty response text".to_string(),
            ));
        }

        tracing::debug!(
            status = status.as_u16(),
            sources = parsed.sources.len(),
            "Chat response received"
        );
        Ok(parsed)
    }
}

/// Map a non-success status and its body to a dispatch error.
fn classify_failure(status: StatusCode, body: &[u8]) -> DispatchError {
    let error_body: Option<ErrorBody> = serde_json::from_slice(body).ok();

    if status == StatusCode::UNPROCESSABLE_ENTITY
        && error_body.as_ref().is_some_and(|b| b.error == "low_confidence")
    {
        let message = error_body.map(|b| b.message).unwrap_or_default();
        return DispatchError::LowConfidence(message);
    }

    let message = match error_body {
        Some(b) if !b.message.is_empty() => b.message,
        Some(b) => b.error,
        None => String::from_utf8_lossy(body).into_owned(),
    };
    DispatchError::Rejected {
        status: status.as_u16(),
        message,
    }
}
