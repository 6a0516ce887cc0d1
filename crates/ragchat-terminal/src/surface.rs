//! Terminal Session surface.
//!
//! Blocks on one line of input, lets the chat session run the exchange, then
//! prints the answer and its sources. Works over any async line reader and
//! any writer, so the whole transcript can be driven from memory in tests.

use std::io::{self, Write};
use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use ragchat_chat::{ConversationLog, DisplayPayload, Input, Role, Surface};
use ragchat_core::config::{TerminalConfig, DEFAULT_RESULT_COUNT};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Typed on its own line (any case) to end the session.
pub const EXIT_KEYWORD: &str = "exit";

/// Presentation settings for one terminal session.
#[derive(Debug, Clone)]
pub struct TerminalOptions {
    pub prompt: String,
    /// Result count sent with every query.
    pub result_count: u32,
    /// Emit ANSI colors.
    pub color: bool,
    /// Show a spinner on stderr while a query is in flight.
    pub spinner: bool,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            result_count: DEFAULT_RESULT_COUNT,
            color: false,
            spinner: false,
        }
    }
}

impl TerminalOptions {
    pub fn from_config(config: &TerminalConfig, result_count: u32) -> Self {
        Self {
            prompt: config.prompt.clone(),
            result_count,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_spinner(mut self, spinner: bool) -> Self {
        self.spinner = spinner;
        self
    }
}

/// A chat surface over a line reader and a writer.
pub struct TerminalSurface<R, W> {
    reader: R,
    writer: W,
    options: TerminalOptions,
    log: ConversationLog,
    spinner: Option<ProgressBar>,
}

/// Surface bound to the process's stdin and stdout.
pub type StdioSurface = TerminalSurface<BufReader<tokio::io::Stdin>, io::Stdout>;

/// Build a surface over stdin and stdout.
pub fn stdio(options: TerminalOptions) -> StdioSurface {
    TerminalSurface::new(BufReader::new(tokio::io::stdin()), io::stdout(), options)
}

impl<R, W> TerminalSurface<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(reader: R, writer: W, options: TerminalOptions) -> Self {
        Self {
            reader,
            writer,
            options,
            log: ConversationLog::new(),
            spinner: None,
        }
    }

    pub fn options(&self) -> &TerminalOptions {
        &self.options
    }

    /// Every entry rendered so far, the user's own lines included.
    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn write_prompt(&mut self) -> io::Result<()> {
        if self.options.color {
            write!(self.writer, "{}", self.options.prompt.bold())?;
        } else {
            write!(self.writer, "{}", self.options.prompt)?;
        }
        self.writer.flush()
    }

    fn write_payload(&mut self, payload: &DisplayPayload) -> io::Result<()> {
        writeln!(self.writer, "{}", payload.text)?;
        if !payload.source_items.is_empty() {
            writeln!(self.writer)?;
            if self.options.color {
                writeln!(self.writer, "{}", "Sources".bold())?;
            } else {
                writeln!(self.writer, "Sources")?;
            }
            for item in &payload.source_items {
                if self.options.color {
                    writeln!(self.writer, "  {}", item.dimmed())?;
                } else {
                    writeln!(self.writer, "  {}", item)?;
                }
            }
        }
        writeln!(self.writer)?;
        self.writer.flush()
    }

    fn start_spinner(&mut self, status_text: &str) {
        if !self.options.spinner {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        let template = if self.options.color {
            "{spinner:.cyan} {msg}"
        } else {
            "{spinner} {msg}"
        };
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/", "-"])
            .template(template)
        {
            spinner.set_style(style);
        }
        spinner.set_message(status_text.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

#[async_trait]
impl<R, W> Surface for TerminalSurface<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn acquire_input(&mut self) -> Option<Input> {
        if let Err(e) = self.write_prompt() {
            tracing::warn!(error = %e, "Failed to write prompt");
        }

        // Invalid UTF-8 still makes a question, with U+FFFD in its place.
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                tracing::debug!("End of input");
                // Leave the shell prompt on a fresh line.
                if let Err(e) = writeln!(self.writer) {
                    tracing::warn!(error = %e, "Failed to write newline");
                }
                None
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).into_owned();
                if line.trim().eq_ignore_ascii_case(EXIT_KEYWORD) {
                    return Some(Input::Exit);
                }
                Some(Input::Query {
                    text: line,
                    result_count: self.options.result_count.to_string(),
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read input");
                None
            }
        }
    }

    fn render(&mut self, role: Role, payload: &DisplayPayload) {
        self.log.append(role, payload);
        // The user's line is already on screen.
        if role == Role::User {
            return;
        }
        self.stop_spinner();
        if let Err(e) = self.write_payload(payload) {
            tracing::warn!(error = %e, "Failed to write answer");
        }
    }

    fn set_busy(&mut self, busy: bool, status_text: &str) {
        if busy {
            self.start_spinner(status_text);
        } else {
            self.stop_spinner();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
