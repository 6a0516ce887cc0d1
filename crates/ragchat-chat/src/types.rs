//! Value types shared by the builder, dispatcher, renderer and surfaces.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Request / result
// =============================================================================

/// A validated query, ready to be sent.
///
/// Only [`crate::QueryBuilder`] creates these, so `text` is always trimmed
/// and non-empty and `result_count` is always at least 1. Serializes to the
/// backend wire shape `{"query": ..., "n_results": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    #[serde(rename = "query")]
    text: String,
    #[serde(rename = "n_results")]
    result_count: u32,
}

impl QueryRequest {
    pub(crate) fn new(text: String, result_count: u32) -> Self {
        debug_assert!(!text.is_empty());
        debug_assert!(result_count >= 1);
        Self { text, result_count }
    }

    /// The trimmed question text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of source snippets requested.
    pub fn result_count(&self) -> u32 {
        self.result_count
    }
}

/// How a dispatch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The endpoint could not be reached at all.
    Transport,
    /// The backend answered, but with a failure status or unusable content.
    Http,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport error"),
            FailureKind::Http => write!(f, "HTTP error"),
        }
    }
}

/// Outcome of exactly one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum QueryResult {
    Success {
        answer: String,
        sources: Vec<String>,
    },
    Failure {
        kind: FailureKind,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },
}

impl QueryResult {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Success { .. })
    }
}

/// What a surface actually shows for one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPayload {
    pub text: String,
    pub source_items: Vec<String>,
}

impl DisplayPayload {
    /// A payload with no sources, e.g. the echo of the user's question.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_items: Vec::new(),
        }
    }
}

// =============================================================================
// Conversation
// =============================================================================

/// Who an entry in the conversation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

/// One rendered line of conversation as kept by a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Session state
// =============================================================================

/// Whether a session accepts new input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for input.
    Idle,
    /// One request is in flight; new input is refused.
    Busy,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Busy => write!(f, "Busy"),
        }
    }
}

/// Snapshot of a session's phase and status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub status_text: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            status_text: String::new(),
        }
    }
}
