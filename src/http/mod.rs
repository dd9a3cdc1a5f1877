//! HTTP API surface
//!
//! - POST /upload - Upload an audio file and transcribe it
//! - POST /response - Answer a question about the current transcript
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
