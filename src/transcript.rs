use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the most recent transcript.
///
/// The service keeps exactly one transcript at a time: each successful
/// upload replaces it, a failed upload leaves it alone. Initialized empty;
/// nothing survives a process restart.
#[derive(Clone, Default)]
pub struct TranscriptStore {
    current: Arc<RwLock<Option<String>>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored transcript with the latest transcription result.
    pub async fn replace(&self, text: String) {
        let mut guard = self.current.write().await;
        *guard = Some(text);
    }

    /// Snapshot of the current transcript, `None` before the first
    /// successful upload.
    pub async fn current(&self) -> Option<String> {
        self.current.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty() {
        let store = TranscriptStore::new();
        assert_eq!(store.current().await, None);
    }

    #[tokio::test]
    async fn replace_overwrites_previous_transcript() {
        let store = TranscriptStore::new();

        store.replace("first meeting notes".to_string()).await;
        assert_eq!(store.current().await.as_deref(), Some("first meeting notes"));

        store.replace("second meeting notes".to_string()).await;
        // Only the most recent transcript is kept
        assert_eq!(store.current().await.as_deref(), Some("second meeting notes"));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = TranscriptStore::new();
        let other = store.clone();

        store.replace("shared".to_string()).await;
        assert_eq!(other.current().await.as_deref(), Some("shared"));
    }
}
