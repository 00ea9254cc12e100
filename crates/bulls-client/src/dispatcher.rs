//! Client-side query dispatcher.
//!
//! Accepts free text, records it in the conversation log, sends it through a
//! [`ChatTransport`], and records exactly one assistant entry per accepted
//! submission. At most one submission is in flight at a time; others are
//! ignored rather than queued.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::FutureExt;

use bulls_core::config::ClientConfig;
use bulls_core::{ChatRequest, ConversationEntry, Role, NO_CONFIDENT_ANSWER_MESSAGE};

use crate::error::DispatchError;
use crate::log::ConversationLog;
use crate::session::{ChatSession, SessionStatus};
use crate::transport::{ChatTransport, HttpTransport};

/// Why a submission was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Blank after trimming.
    Empty,
    /// Another submission is still awaiting its answer.
    InFlight,
}

/// Result of [`QueryDispatcher::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The server answered; the entry holds its text.
    Answered(ConversationEntry),
    /// The request failed; the entry holds the substituted message.
    Fallback {
        entry: ConversationEntry,
        cause: DispatchError,
    },
    Ignored(IgnoreReason),
}

impl SubmitOutcome {
    /// The assistant entry appended by this submission, if any.
    pub fn entry(&self) -> Option<&ConversationEntry> {
        match self {
            SubmitOutcome::Answered(entry) | SubmitOutcome::Fallback { entry, .. } => Some(entry),
            SubmitOutcome::Ignored(_) => None,
        }
    }
}

/// Holds the in-flight flag for one submission and clears it on drop,
/// including during unwinding.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// One conversation with one backend.
pub struct QueryDispatcher {
    transport: Box<dyn ChatTransport>,
    log: Mutex<ConversationLog>,
    in_flight: AtomicBool,
    session_id: String,
    fallback_message: String,
}

impl QueryDispatcher {
    pub fn new(transport: Box<dyn ChatTransport>, config: &ClientConfig) -> Self {
        Self {
            transport,
            log: Mutex::new(ConversationLog::new()),
            in_flight: AtomicBool::new(false),
            session_id: config.session_id.clone(),
            fallback_message: config.fallback_text(),
        }
    }

    /// Dispatcher over HTTP to `config.api_base_url`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, DispatchError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Box::new(transport), config))
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_awaiting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn entries(&self) -> Vec<ConversationEntry> {
        self.lock_log().entries().to_vec()
    }

    /// Snapshot of the log and status.
    pub fn session(&self) -> ChatSession {
        let status = if self.is_awaiting() {
            SessionStatus::Awaiting
        } else {
            SessionStatus::Idle
        };
        ChatSession {
            session_id: self.session_id.clone(),
            entries: self.entries(),
            status,
        }
    }

    /// Submit one query.
    ///
    /// Blank text and submissions made while another is in flight are
    /// ignored and leave the log untouched. Otherwise exactly one user entry
    /// and one assistant entry are appended.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::Empty);
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!(session_id = %self.session_id, "Submission ignored, query in flight");
            return SubmitOutcome::Ignored(IgnoreReason::InFlight);
        };

        self.append(Role::User, text);
        let request = ChatRequest::new(text, self.session_id.clone());

        let sent = AssertUnwindSafe(self.transport.send(&request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(DispatchError::Internal(panic_detail(panic))));

        match sent {
            Ok(response) => SubmitOutcome::Answered(self.append(Role::Assistant, response.response)),
            Err(cause) => {
                let message = match &cause {
                    DispatchError::LowConfidence(_) => {
                        tracing::info!(session_id = %self.session_id, "No confident answer");
                        NO_CONFIDENT_ANSWER_MESSAGE.to_string()
                    }
                    _ => {
                        tracing::warn!(
                            session_id = %self.session_id,
                            error = %cause,
                            "Chat request failed, using fallback message"
                        );
                        self.fallback_message.clone()
                    }
                };
                let entry = self.append(Role::Assistant, message);
                SubmitOutcome::Fallback { entry, cause }
            }
        }
    }

    fn append(&self, role: Role, content: impl Into<String>) -> ConversationEntry {
        self.lock_log().append(role, content)
    }

    fn lock_log(&self) -> MutexGuard<'_, ConversationLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_detail(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "transport panicked".to_string()
    }
}
