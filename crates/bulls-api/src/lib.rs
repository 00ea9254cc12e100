//! BullsAI API crate - axum HTTP server and route handlers.
//!
//! Serves `POST /api/chat` (one query in, one answer out), plus the
//! welcome and health endpoints.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
