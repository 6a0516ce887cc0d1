//! Application state shared across all route handlers.
//!
//! The widget server hosts exactly one chat session, so there is one
//! [`ChatSession`] and one conversation log behind every request.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use ragchat_chat::{ChatSession, ConversationLog, DisplayPayload, Role};
use ragchat_core::config::WidgetConfig;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// The session every request submits to.
    pub session: Arc<ChatSession>,
    /// Everything the widget has shown, welcome entry first.
    pub log: Arc<Mutex<ConversationLog>>,
    /// Widget settings (bind address, status text, welcome).
    pub config: Arc<WidgetConfig>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create the state and emit the welcome entry, if one is configured.
    pub fn new(session: ChatSession, config: WidgetConfig) -> Self {
        let mut log = ConversationLog::new();
        if !config.welcome.trim().is_empty() {
            log.append(Role::Assistant, &DisplayPayload::text_only(&config.welcome));
        }
        Self {
            session: Arc::new(session),
            log: Arc::new(Mutex::new(log)),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Lock the conversation log. Entries are only ever appended, so a
    /// poisoned lock still guards a usable log.
    pub fn lock_log(&self) -> MutexGuard<'_, ConversationLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
