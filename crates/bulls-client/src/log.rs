//! Append-only conversation log.

use chrono::Utc;

use bulls_core::{ConversationEntry, EntryId, Role};

/// Ordered list of conversation entries.
///
/// Entries are never edited or removed. Ids start at 1 and increase by one
/// per append.
#[derive(Debug, Default)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
    next_id: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return a copy of it.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> ConversationEntry {
        self.next_id += 1;
        let entry = ConversationEntry {
            id: EntryId(self.next_id),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        };
        self.entries.push(entry.clone());
        entry
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }
}
