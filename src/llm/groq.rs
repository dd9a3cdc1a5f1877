use super::messages::{ChatCompletionRequest, ChatMessage, StreamChunk, TranscriptionResponse};
use super::{ChatCompleter, Transcriber};
use crate::config::GroqConfig;
use anyhow::{bail, Context, Result};
use futures::TryStreamExt;
use reqwest::multipart;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Fixed instruction sent with every transcription request
const TRANSCRIPTION_PROMPT: &str = "generate text of what you hear";

/// Client for the Groq OpenAI-compatible API (Whisper transcription and
/// Llama 3 chat completions).
pub struct GroqClient {
    http: reqwest::Client,
    api_key: String,
    config: GroqConfig,
}

impl GroqClient {
    /// Build a client from config plus the ambient GROQ_API_KEY variable.
    pub fn from_env(config: GroqConfig) -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .context("GROQ_API_KEY environment variable not set")?;

        info!("Groq client configured for {}", config.api_base);

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            config,
        })
    }
}

#[async_trait::async_trait]
impl Transcriber for GroqClient {
    async fn transcribe(&self, filename: &str, audio: Vec<u8>) -> Result<String> {
        let url = format!("{}/audio/transcriptions", self.config.api_base);
        info!(
            "Transcribing {} ({} bytes) with {}",
            filename,
            audio.len(),
            self.config.transcription_model
        );

        let part = multipart::Part::bytes(audio).file_name(filename.to_string());
        let form = multipart::Form::new()
            .part("file", part)
            .text("model", self.config.transcription_model.clone())
            .text("prompt", TRANSCRIPTION_PROMPT)
            .text("response_format", "verbose_json");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Transcription request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Groq transcription API error ({}): {}", status, body);
        }

        let transcription: TranscriptionResponse = response
            .json()
            .await
            .context("Failed to parse transcription response")?;

        info!("Transcription complete ({} chars)", transcription.text.len());
        Ok(transcription.text)
    }
}

#[async_trait::async_trait]
impl ChatCompleter for GroqClient {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<mpsc::Receiver<Result<String>>> {
        let url = format!("{}/chat/completions", self.config.api_base);
        let request = ChatCompletionRequest {
            model: self.config.chat_model.clone(),
            messages,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
            stream: true,
        };

        info!("Starting chat completion with {}", request.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Groq chat API error ({}): {}", status, body);
        }

        let (tx, rx) = mpsc::channel::<Result<String>>(100);

        // Drain the SSE stream on a separate task; deltas flow down the
        // channel in delivery order. A transport failure mid-stream is
        // delivered as a final Err item so the caller can distinguish it
        // from a clean finish. Dropping the receiver stops the task.
        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer = String::new();

            loop {
                let bytes = match stream.try_next().await {
                    Ok(Some(bytes)) => bytes,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Chat stream died mid-completion: {}", e);
                        let _ = tx
                            .send(Err(anyhow::anyhow!("Chat completion stream failed: {}", e)))
                            .await;
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&bytes));

                // Process complete SSE lines only; partial lines stay buffered
                while let Some(newline_pos) = buffer.find('\n') {
                    let line = buffer[..newline_pos].trim().to_string();
                    buffer.drain(..newline_pos + 1);

                    match parse_sse_line(&line) {
                        SseEvent::Delta(text) => {
                            if tx.send(Ok(text)).await.is_err() {
                                // Receiver dropped, stop reading
                                return;
                            }
                        }
                        SseEvent::Done => {
                            debug!("Chat completion stream finished");
                            return;
                        }
                        SseEvent::Skip => {}
                    }
                }
            }
        });

        Ok(rx)
    }
}

pub(crate) enum SseEvent {
    /// A chunk carrying generated text
    Delta(String),
    /// The `[DONE]` terminator
    Done,
    /// Blank lines, contentless chunks, unparsable data
    Skip,
}

/// Interpret one line of the chat-completion SSE stream.
pub(crate) fn parse_sse_line(line: &str) -> SseEvent {
    let Some(data) = line.strip_prefix("data: ") else {
        return SseEvent::Skip;
    };

    if data == "[DONE]" {
        return SseEvent::Done;
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => {
            let content = chunk
                .choices
                .first()
                .and_then(|choice| choice.delta.content.clone());
            match content {
                Some(text) if !text.is_empty() => SseEvent::Delta(text),
                _ => SseEvent::Skip,
            }
        }
        Err(e) => {
            debug!("Skipping unparsable SSE chunk: {} - data: {}", e, data);
            SseEvent::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_content_delta() {
        let line = r#"data: {"choices":[{"delta":{"content":"hello"}}]}"#;
        match parse_sse_line(line) {
            SseEvent::Delta(text) => assert_eq!(text, "hello"),
            _ => panic!("expected a delta"),
        }
    }

    #[test]
    fn done_marker_ends_stream() {
        assert!(matches!(parse_sse_line("data: [DONE]"), SseEvent::Done));
    }

    #[test]
    fn role_only_chunk_contributes_nothing() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert!(matches!(parse_sse_line(line), SseEvent::Skip));
    }

    #[test]
    fn empty_content_contributes_nothing() {
        let line = r#"data: {"choices":[{"delta":{"content":""}}]}"#;
        assert!(matches!(parse_sse_line(line), SseEvent::Skip));
    }

    #[test]
    fn blank_and_garbage_lines_are_skipped() {
        assert!(matches!(parse_sse_line(""), SseEvent::Skip));
        assert!(matches!(parse_sse_line("data: not-json"), SseEvent::Skip));
        assert!(matches!(parse_sse_line(": keepalive"), SseEvent::Skip));
    }
}
