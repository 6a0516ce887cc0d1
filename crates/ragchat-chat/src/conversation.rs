//! Append-only record of what a surface has shown.

use chrono::Utc;
use uuid::Uuid;

use crate::types::{ConversationEntry, DisplayPayload, Role};

/// Ordered entries rendered by one surface. Entries are never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rendered payload and return the stored entry.
    pub fn append(&mut self, role: Role, payload: &DisplayPayload) -> &ConversationEntry {
        self.entries.push(ConversationEntry {
            id: Uuid::new_v4(),
            role,
            text: payload.text.clone(),
            sources: payload.source_items.clone(),
            created_at: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Entries appended at or after position `start`.
    pub fn since(&self, start: usize) -> &[ConversationEntry] {
        &self.entries[start.min(self.entries.len())..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
