//! BullsAI client - conversation log and query dispatcher.
//!
//! The dispatcher keeps one append-only conversation per session, sends one
//! query at a time to the answer service, and turns every failure into a
//! fixed assistant message.

pub mod dispatcher;
pub mod error;
pub mod log;
pub mod session;
pub mod transport;

pub use dispatcher::{IgnoreReason, QueryDispatcher, SubmitOutcome};
pub use error::DispatchError;
pub use log::ConversationLog;
pub use session::{ChatSession, SessionStatus};
pub use transport::{ChatTransport, HttpTransport};
