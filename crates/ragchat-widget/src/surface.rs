//! Browser UI surface, server side.
//!
//! One `WebSurface` is built per `POST /api/chat`. It hands the posted
//! question to the session as its only input and records what the session
//! renders into the widget's shared log, so the response can return just the
//! entries this exchange produced.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use ragchat_chat::{ConversationEntry, ConversationLog, DisplayPayload, Input, Role, Surface};

pub struct WebSurface {
    pending: Option<Input>,
    log: Arc<Mutex<ConversationLog>>,
    appended: Vec<ConversationEntry>,
}

impl WebSurface {
    pub fn new(input: Input, log: Arc<Mutex<ConversationLog>>) -> Self {
        Self {
            pending: Some(input),
            log,
            appended: Vec::new(),
        }
    }

    /// Entries rendered through this surface, oldest first.
    pub fn into_appended(self) -> Vec<ConversationEntry> {
        self.appended
    }
}

#[async_trait]
impl Surface for WebSurface {
    async fn acquire_input(&mut self) -> Option<Input> {
        self.pending.take()
    }

    fn render(&mut self, role: Role, payload: &DisplayPayload) {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = log.append(role, payload).clone();
        self.appended.push(entry);
    }

    fn set_busy(&mut self, busy: bool, status_text: &str) {
        // The page drives its own form; the session's state answers pollers.
        tracing::debug!(busy, status = status_text, "Widget busy indicator");
    }
}
