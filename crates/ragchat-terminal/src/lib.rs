//! Terminal Session adapter for ragchat.
//!
//! A blocking prompt loop over any line reader: one question per line, the
//! answer and its sources printed beneath it, `exit` or end of input to quit.

pub mod banner;
pub mod surface;

pub use banner::Banner;
pub use surface::{stdio, StdioSurface, TerminalOptions, TerminalSurface, EXIT_KEYWORD};
