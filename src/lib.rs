pub mod config;
pub mod http;
pub mod llm;
pub mod transcript;

pub use config::Config;
pub use http::{create_router, AppState};
pub use llm::{ChatCompleter, ChatMessage, GroqClient, Transcriber};
pub use transcript::TranscriptStore;
