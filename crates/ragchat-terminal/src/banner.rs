//! Startup banner for the terminal session.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::surface::EXIT_KEYWORD;

/// What the banner reports about the session about to start.
#[derive(Debug, Clone)]
pub struct Banner<'a> {
    pub version: &'a str,
    pub endpoint: &'a str,
    pub result_count: u32,
}

impl Banner<'_> {
    /// Banner text, one line per fact, ending with a blank line.
    pub fn render(&self, color: bool) -> String {
        let title = format!("ragchat v{}", self.version);
        let title = if color {
            title.bold().to_string()
        } else {
            title
        };
        let hint = format!(
            "Ask a question and press Enter. Type '{}' to quit.",
            EXIT_KEYWORD
        );
        let hint = if color { hint.dimmed().to_string() } else { hint };

        format!(
            "{}\nBackend: {}\nSources per answer: {}\n{}\n\n",
            title, self.endpoint, self.result_count, hint
        )
    }

    pub fn write_to<W: Write>(&self, writer: &mut W, color: bool) -> io::Result<()> {
        writer.write_all(self.render(color).as_bytes())?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banner() -> Banner<'static> {
        Banner {
            version: "0.1.0",
            endpoint: "http://127.0.0.1:5000/api/query",
            result_count: 3,
        }
    }

    #[test]
    fn test_banner_reports_session_facts() {
        let text = banner().render(false);
        assert!(text.starts_with("ragchat v0.1.0\n"));
        assert!(text.contains("Backend: http://127.0.0.1:5000/api/query"));
        assert!(text.contains("Sources per answer: 3"));
        assert!(text.contains("Type 'exit' to quit."));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_plain_banner_has_no_escape_codes() {
        assert!(!banner().render(false).contains('\u{1b}'));
    }

    #[test]
    fn test_colored_banner_keeps_text() {
        let text = banner().render(true);
        assert!(text.contains('\u{1b}'));
        assert!(text.contains("ragchat v0.1.0"));
    }

    #[test]
    fn test_write_to() {
        let mut out = Vec::new();
        banner().write_to(&mut out, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), banner().render(false));
    }
}
