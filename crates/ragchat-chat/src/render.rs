//! Response rendering: from a [`QueryResult`] to what a surface shows.
//!
//! Pure and deterministic. Truncation only ever happens on the copy that is
//! displayed; the result itself is borrowed, never changed.

use crate::types::{DisplayPayload, FailureKind, QueryResult};

// =============================================================================
// SnippetStyle
// =============================================================================

/// How source snippets are shortened for one kind of surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetStyle {
    /// Maximum snippet length in characters, marker excluded.
    pub width: usize,
    /// Appended only when something was actually cut.
    pub marker: &'static str,
}

impl SnippetStyle {
    /// Roomy layout of the browser widget.
    pub const RICH: SnippetStyle = SnippetStyle {
        width: 200,
        marker: "\u{2026}",
    };

    /// Compact layout of the terminal.
    pub const COMPACT: SnippetStyle = SnippetStyle {
        width: 100,
        marker: "...",
    };
}

// =============================================================================
// ResponseRenderer
// =============================================================================

/// Formats exchange outcomes for display.
#[derive(Debug, Clone, Copy)]
pub struct ResponseRenderer {
    style: SnippetStyle,
}

impl ResponseRenderer {
    pub fn new(style: SnippetStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> SnippetStyle {
        self.style
    }

    /// Render a result.
    ///
    /// Success: the answer verbatim plus `[n] snippet` per source, in order.
    /// Failure: one `Error: ...` line and no sources.
    pub fn render(&self, result: &QueryResult) -> DisplayPayload {
        match result {
            QueryResult::Success { answer, sources } => DisplayPayload {
                text: answer.clone(),
                source_items: sources
                    .iter()
                    .enumerate()
                    .map(|(i, source)| format!("[{}] {}", i + 1, self.snippet(source)))
                    .collect(),
            },
            QueryResult::Failure {
                kind,
                message,
                status_code,
            } => DisplayPayload::text_only(format_failure(*kind, *status_code, message)),
        }
    }

    /// Collapse line breaks and cut `source` to the style's width.
    pub fn snippet(&self, source: &str) -> String {
        let flat = collapse_line_breaks(source);
        match flat.char_indices().nth(self.style.width) {
            Some((cut, _)) => {
                let mut short = String::with_capacity(cut + self.style.marker.len());
                short.push_str(&flat[..cut]);
                short.push_str(self.style.marker);
                short
            }
            None => flat,
        }
    }
}

/// One human-readable line for a failed exchange.
pub fn format_failure(kind: FailureKind, status_code: Option<u16>, message: &str) -> String {
    match (kind, status_code) {
        (FailureKind::Transport, _) => format!("Error: could not reach backend: {}", message),
        (FailureKind::Http, Some(code)) if message.is_empty() => format!("Error: HTTP {}", code),
        (FailureKind::Http, Some(code)) => format!("Error: HTTP {} {}", code, message),
        (FailureKind::Http, None) => format!("Error: invalid response from backend: {}", message),
    }
}

/// Every `\r\n`, `\n` or `\r` becomes a single space.
fn collapse_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
