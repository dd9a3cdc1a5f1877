use crate::llm::{ChatCompleter, Transcriber};
use crate::transcript::TranscriptStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Most recent transcript (shared across requests)
    pub transcript: TranscriptStore,

    /// Speech-to-text collaborator
    pub transcriber: Arc<dyn Transcriber>,

    /// Chat-completion collaborator
    pub chat: Arc<dyn ChatCompleter>,

    /// Where uploaded audio files are written (and left)
    pub uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        chat: Arc<dyn ChatCompleter>,
        uploads_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            transcript: TranscriptStore::new(),
            transcriber,
            chat,
            uploads_dir: uploads_dir.into(),
        }
    }
}
