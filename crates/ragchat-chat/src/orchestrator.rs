//! Chat session: the one orchestration sequence every surface shares.
//!
//! A surface only knows how to get input, show entries and toggle its busy
//! indicator. Validation, dispatch, rendering and the Idle/Busy discipline
//! all live here.

use std::sync::Arc;

use async_trait::async_trait;

use crate::builder::QueryBuilder;
use crate::dispatcher::Backend;
use crate::error::ChatError;
use crate::render::ResponseRenderer;
use crate::state::SessionStateMachine;
use crate::types::{DisplayPayload, QueryRequest, QueryResult, Role, SessionState};

/// Status text shown while a query is in flight, unless configured otherwise.
pub const DEFAULT_STATUS_TEXT: &str = "Thinking...";

// =============================================================================
// Surface contract
// =============================================================================

/// One unit of raw input acquired by a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A question plus the raw, unvalidated result count.
    Query { text: String, result_count: String },
    /// End the session without dispatching anything.
    Exit,
}

impl Input {
    pub fn query(text: impl Into<String>, result_count: impl Into<String>) -> Self {
        Input::Query {
            text: text.into(),
            result_count: result_count.into(),
        }
    }
}

/// A presentation surface: where input comes from and where output goes.
#[async_trait]
pub trait Surface: Send {
    /// Wait for the next input. `None` when the source is exhausted.
    async fn acquire_input(&mut self) -> Option<Input>;

    /// Show one entry and append it to the surface's conversation log.
    fn render(&mut self, role: Role, payload: &DisplayPayload);

    /// Disable or re-enable input and show or clear the status indicator.
    fn set_busy(&mut self, busy: bool, status_text: &str);
}

// =============================================================================
// ChatSession
// =============================================================================

/// Everything one completed exchange produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub request: QueryRequest,
    pub result: QueryResult,
    pub payload: DisplayPayload,
}

/// Drives exchanges for one session. At most one is in flight at a time.
pub struct ChatSession {
    backend: Arc<dyn Backend>,
    builder: QueryBuilder,
    renderer: ResponseRenderer,
    state: SessionStateMachine,
    status_text: String,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn Backend>, builder: QueryBuilder, renderer: ResponseRenderer) -> Self {
        Self {
            backend,
            builder,
            renderer,
            state: SessionStateMachine::new(),
            status_text: DEFAULT_STATUS_TEXT.to_string(),
        }
    }

    /// Replace the in-progress status text.
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// Snapshot of the session's phase and status text.
    pub fn state(&self) -> SessionState {
        self.state.current()
    }

    /// Validate raw input and run one exchange.
    ///
    /// Nothing is built, rendered or sent when the session is busy or the
    /// input is empty.
    pub async fn submit<S>(
        &self,
        surface: &mut S,
        raw_text: &str,
        raw_result_count: &str,
    ) -> Result<Exchange, ChatError>
    where
        S: Surface + ?Sized,
    {
        if self.state.is_busy() {
            return Err(ChatError::Busy);
        }
        let request = self.builder.build(raw_text, raw_result_count)?;
        self.submit_request(surface, request).await
    }

    /// Run one exchange for an already built request.
    pub async fn submit_request<S>(
        &self,
        surface: &mut S,
        request: QueryRequest,
    ) -> Result<Exchange, ChatError>
    where
        S: Surface + ?Sized,
    {
        let guard = self.state.begin(&self.status_text)?;

        surface.render(Role::User, &DisplayPayload::text_only(request.text()));
        surface.set_busy(true, &self.status_text);

        let result = self.backend.dispatch(&request).await;
        let payload = self.renderer.render(&result);
        surface.render(Role::Assistant, &payload);

        let released = guard.finish();
        surface.set_busy(false, "");
        released?;

        Ok(Exchange {
            request,
            result,
            payload,
        })
    }

    /// Take one input from the surface and submit it.
    ///
    /// `Ok(None)` means the surface asked to stop or ran out of input.
    pub async fn submit_next<S>(&self, surface: &mut S) -> Result<Option<Exchange>, ChatError>
    where
        S: Surface + ?Sized,
    {
        match surface.acquire_input().await {
            None => Ok(None),
            Some(Input::Exit) => {
                tracing::debug!("Exit requested");
                Ok(None)
            }
            Some(Input::Query { text, result_count }) => self
                .submit(surface, &text, &result_count)
                .await
                .map(Some),
        }
    }

    /// Process inputs until the surface stops. Returns the number of
    /// completed exchanges.
    pub async fn run<S>(&self, surface: &mut S) -> Result<usize, ChatError>
    where
        S: Surface + ?Sized,
    {
        let mut completed = 0;
        loop {
            match self.submit_next(surface).await {
                Ok(Some(_)) => completed += 1,
                Ok(None) => break,
                Err(ChatError::Validation(reason)) => {
                    tracing::debug!(reason = %reason, "Ignoring input");
                }
                Err(ChatError::Busy) => {
                    tracing::warn!("Input arrived while a query was in flight; ignored");
                }
                Err(e) => return Err(e),
            }
        }
        tracing::info!(exchanges = completed, "Session ended");
        Ok(completed)
    }
}

// =============================================================================
// Tests
// =============================================================================
