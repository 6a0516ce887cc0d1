pub mod config;
pub mod error;

pub use config::RagchatConfig;
pub use error::{RagchatError, Result};
