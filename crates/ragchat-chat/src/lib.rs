//! Query orchestration for ragchat.
//!
//! Turns one line of user text into a backend request, classifies the
//! outcome, formats it for display, and drives the per-session
//! Idle/Busy state that every presentation surface obeys.

pub mod builder;
pub mod conversation;
pub mod dispatcher;
pub mod error;
pub mod orchestrator;
pub mod render;
pub mod state;
pub mod types;

pub use builder::QueryBuilder;
pub use conversation::ConversationLog;
pub use dispatcher::{Backend, HttpDispatcher};
pub use error::{ChatError, ValidationError};
pub use orchestrator::{ChatSession, Exchange, Input, Surface, DEFAULT_STATUS_TEXT};
pub use render::{ResponseRenderer, SnippetStyle};
pub use state::{BusyGuard, SessionStateMachine};
pub use types::{
    ConversationEntry, DisplayPayload, FailureKind, Phase, QueryRequest, QueryResult, Role,
    SessionState,
};
