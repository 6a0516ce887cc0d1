//! Route handler functions for the widget server.

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};

use ragchat_chat::{ConversationEntry, Input, Phase, SessionState};

use crate::error::ApiError;
use crate::page;
use crate::state::AppState;
use crate::surface::WebSurface;

// =============================================================================
// Page and health
// =============================================================================

/// GET / - serve the widget page.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Html(page::render_page(&state.config.status_text))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub phase: Phase,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        phase: state.session.state().phase,
    })
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub state: SessionState,
    pub entries: Vec<ConversationEntry>,
}

/// GET /api/session - current phase and the whole conversation.
pub async fn session(State(state): State<AppState>) -> Json<SessionResponse> {
    let entries = state.lock_log().entries().to_vec();
    Json(SessionResponse {
        state: state.session.state(),
        entries,
    })
}

// =============================================================================
// Chat
// =============================================================================

/// Request body for POST /api/chat.
///
/// `n_results` arrives as whatever the page's number field holds: a string,
/// a number, or nothing at all.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default)]
    pub n_results: Option<serde_json::Value>,
}

impl ChatRequest {
    /// The result count as raw text for the query builder.
    fn raw_result_count(&self) -> String {
        match &self.n_results {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Entries this exchange appended: the question, then the answer.
    pub entries: Vec<ConversationEntry>,
    pub state: SessionState,
}

/// POST /api/chat - run one exchange.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let input = Input::Query {
        result_count: body.raw_result_count(),
        text: body.query,
    };
    let mut surface = WebSurface::new(input, state.log.clone());

    match state.session.submit_next(&mut surface).await {
        Ok(Some(exchange)) => {
            tracing::debug!(
                success = exchange.result.is_success(),
                sources = exchange.payload.source_items.len(),
                "Widget exchange complete"
            );
            Ok(Json(ChatResponse {
                entries: surface.into_appended(),
                state: state.session.state(),
            }))
        }
        Ok(None) => Err(ApiError::BadRequest("no query submitted".to_string())),
        Err(e) => {
            if e.is_recoverable() {
                tracing::debug!(error = %e, "Widget submission refused");
            } else {
                tracing::warn!(error = %e, "Widget exchange failed");
            }
            Err(e.into())
        }
    }
}
