//! Browser UI adapter for ragchat.
//!
//! Serves a self-contained chat widget page and the small JSON API it talks
//! to. Each posted question runs through the shared chat session on the
//! server, and the page shows the entries the exchange produced.

pub mod error;
pub mod handlers;
pub mod page;
pub mod routes;
pub mod state;
pub mod surface;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
pub use surface::WebSurface;
