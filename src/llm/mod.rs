//! Collaborator interfaces for the hosted AI services.
//!
//! Handlers only ever see these traits; the Groq implementation lives in
//! `groq.rs` and test doubles stand in for it in the integration tests.

mod groq;
mod messages;

pub use groq::GroqClient;
pub use messages::ChatMessage;

use anyhow::Result;
use tokio::sync::mpsc;

/// Speech-to-text collaborator.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one audio file's bytes, returning the recognized text.
    async fn transcribe(&self, filename: &str, audio: Vec<u8>) -> Result<String>;
}

/// Chat-completion collaborator with incremental output.
#[async_trait::async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Start a completion for the given messages.
    ///
    /// Returns a channel of text deltas in delivery order. A completion
    /// that dies mid-stream delivers one final `Err` item before the
    /// channel closes, so a closed channel with no error means the stream
    /// finished cleanly. Dropping the receiver cancels the underlying
    /// request.
    async fn complete(&self, messages: Vec<ChatMessage>)
        -> Result<mpsc::Receiver<Result<String>>>;
}
