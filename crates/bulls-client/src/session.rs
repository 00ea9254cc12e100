//! Observable chat session state.
//!
//! A session is either Idle (accepting a submission) or Awaiting (one query
//! in flight):
//! - Idle -> Awaiting (submission accepted)
//! - Awaiting -> Idle (answer, fallback, or unwind)

use std::fmt;

use bulls_core::{ConversationEntry, Role};

/// Whether a query is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Idle,
    Awaiting,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "Idle"),
            SessionStatus::Awaiting => write!(f, "Awaiting"),
        }
    }
}

/// Point-in-time copy of a dispatcher's session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSession {
    pub session_id: String,
    pub entries: Vec<ConversationEntry>,
    pub status: SessionStatus,
}

impl ChatSession {
    pub fn is_awaiting(&self) -> bool {
        self.status == SessionStatus::Awaiting
    }

    /// Render the log as `role: content` lines.
    pub fn transcript(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                let who = match e.role {
                    Role::User => "You",
                    Role::Assistant => "BullsAI",
                };
                format!("{}: {}", who, e.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
