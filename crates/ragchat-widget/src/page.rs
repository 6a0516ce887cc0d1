//! The embedded chat widget page.
//!
//! One self-contained HTML file with its CSS and JavaScript inlined, embedded
//! at compile time so the server has no files to find at runtime. The script
//! talks only to this server's `/api/session` and `/api/chat` routes and
//! inserts every entry with `textContent`.

/// The widget HTML template, served from `GET /` after [`render_page`].
pub const WIDGET_HTML: &str = include_str!("../assets/widget.html");

const STATUS_SLOT: &str = "/*STATUS_TEXT*/'Thinking...'";

/// The page with `status_text` as the in-progress indicator.
///
/// The text becomes a JSON string literal inside the script, with `<` escaped
/// so it can never close the script element.
pub fn render_page(status_text: &str) -> String {
    let literal = serde_json::Value::String(status_text.to_string())
        .to_string()
        .replace('<', "\\u003c");
    WIDGET_HTML.replacen(STATUS_SLOT, &literal, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_html_is_valid_html() {
        assert!(WIDGET_HTML.starts_with("<!DOCTYPE html>"));
        assert!(WIDGET_HTML.contains("<html"));
        assert!(WIDGET_HTML.contains("</html>"));
    }

    #[test]
    fn widget_html_has_chat_form() {
        assert!(WIDGET_HTML.contains("id=\"messages\""));
        assert!(WIDGET_HTML.contains("id=\"chat-form\""));
        assert!(WIDGET_HTML.contains("id=\"user-input\""));
        assert!(WIDGET_HTML.contains("id=\"n-results\""));
        assert!(WIDGET_HTML.contains("id=\"send-btn\""));
        assert!(WIDGET_HTML.contains("id=\"status\""));
    }

    #[test]
    fn widget_html_references_api_routes() {
        assert!(WIDGET_HTML.contains("/api/session"));
        assert!(WIDGET_HTML.contains("/api/chat"));
        assert!(WIDGET_HTML.contains("n_results"));
    }

    #[test]
    fn widget_html_never_injects_markup() {
        assert!(WIDGET_HTML.contains("textContent"));
        assert!(!WIDGET_HTML.contains("innerHTML"));
        assert!(!WIDGET_HTML.contains("insertAdjacentHTML"));
    }

    #[test]
    fn widget_html_has_no_external_urls() {
        assert!(!WIDGET_HTML.contains("http://"));
        assert!(!WIDGET_HTML.contains("https://"));
    }

    #[test]
    fn widget_html_releases_busy_in_every_branch() {
        assert!(WIDGET_HTML.contains("finally"));
        assert!(WIDGET_HTML.contains("setBusy(false, '')"));
        assert!(WIDGET_HTML.contains("el.input.focus()"));
    }

    #[test]
    fn widget_html_waits_out_another_clients_exchange() {
        assert!(WIDGET_HTML.contains("async function waitForIdle()"));
        assert!(WIDGET_HTML.contains("data.phase !== 'idle'"));
        assert!(WIDGET_HTML.contains("setTimeout(waitForIdle, POLL_MS)"));
        assert!(WIDGET_HTML.contains("entries.slice(shownCount).forEach(addEntry)"));

        // Reload during a busy session and a 409 both hand off to the poller.
        let load = &WIDGET_HTML[WIDGET_HTML
            .find("async function loadSession()")
            .unwrap()..];
        let busy = load.find("data.phase === 'busy'").unwrap();
        assert!(load[busy..].contains("setTimeout(waitForIdle, POLL_MS)"));
        assert!(WIDGET_HTML.contains("foreignBusy = res.status === 409"));

        // The poller always ends by re-enabling the form.
        let wait = &WIDGET_HTML[WIDGET_HTML.find("async function waitForIdle()").unwrap()..];
        let end = wait.find("async function loadSession()").unwrap();
        assert!(wait[..end].contains("release();"));
    }

    #[test]
    fn widget_html_has_accessibility_features() {
        assert!(WIDGET_HTML.contains("aria-label"));
        assert!(WIDGET_HTML.contains("role=\"log\""));
        assert!(WIDGET_HTML.contains("prefers-reduced-motion"));
    }

    #[test]
    fn render_page_fills_status_slot() {
        assert!(WIDGET_HTML.contains(STATUS_SLOT));
        let page = render_page("Searching...");
        assert!(page.contains("const STATUS_TEXT = \"Searching...\";"));
        assert!(!page.contains(STATUS_SLOT));
    }

    #[test]
    fn render_page_escapes_script_breakout() {
        let page = render_page("</script><b>x</b>");
        assert_eq!(page.matches("</script>").count(), 1);
        assert!(page.contains("\\u003c/script>"));
    }
}
