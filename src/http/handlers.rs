use super::state::AppState;
use crate::llm::ChatMessage;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Media types accepted for upload (mp3 and wav)
const SUPPORTED_AUDIO_TYPES: [&str; 2] = ["audio/mpeg", "audio/wav"];

/// Fixed reply when the question is empty or whitespace-only
const NO_QUESTION_SENTINEL: &str = "No question provided for the AI to respond.";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub transcription: String,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AiResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /upload
/// Accept a multipart audio file, transcribe it, and store the transcript
pub async fn upload_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    // Locate the uploaded file part
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Error processing audio file: no file part in request"
                            .to_string(),
                    }),
                )
                    .into_response();
            }
            Err(e) => {
                error!("Failed to read multipart body: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: format!("Error processing audio file: {}", e),
                    }),
                )
                    .into_response();
            }
        }
    };

    // Validate the declared media type before any processing
    let content_type = field.content_type().unwrap_or_default().to_string();
    if !SUPPORTED_AUDIO_TYPES.contains(&content_type.as_str()) {
        info!("Rejected upload with unsupported media type: {}", content_type);
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid audio format. Supported formats: mp3, wav.".to_string(),
            }),
        )
            .into_response();
    }

    let filename = match field.file_name() {
        Some(name) => name.to_string(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Error processing audio file: upload has no filename".to_string(),
                }),
            )
                .into_response();
        }
    };

    let data = match field.bytes().await {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to read upload body: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Error processing audio file: {}", e),
                }),
            )
                .into_response();
        }
    };

    info!("Received {} ({} bytes, {})", filename, data.len(), content_type);

    // Save the audio under its original filename; a same-named upload
    // silently overwrites, and the file stays on disk after transcription
    let path = state.uploads_dir.join(&filename);
    if let Err(e) = tokio::fs::write(&path, &data).await {
        error!("Failed to save {}: {}", path.display(), e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Error processing audio file: {}", e),
            }),
        )
            .into_response();
    }

    // Reopen the saved file and submit its contents for transcription
    let audio = match tokio::fs::read(&path).await {
        Ok(audio) => audio,
        Err(e) => {
            error!("Failed to read back {}: {}", path.display(), e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Error processing audio file: {}", e),
                }),
            )
                .into_response();
        }
    };

    match state.transcriber.transcribe(&filename, audio).await {
        Ok(text) => {
            // Replace the stored transcript only on confirmed success
            state.transcript.replace(text.clone()).await;
            (
                StatusCode::OK,
                Json(UploadResponse {
                    transcription: text,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Transcription failed for {}: {}", filename, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Transcription failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /response
/// Answer a free-text question using the current transcript as context
pub async fn generate_response(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> impl IntoResponse {
    // A non-empty transcript must exist before any question can be answered
    let transcription = match state.transcript.current().await {
        Some(text) if !text.is_empty() => text,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No transcription available. Please upload audio first."
                        .to_string(),
                }),
            )
                .into_response();
        }
    };

    // Empty question short-circuits without contacting the model
    if req.text.trim().is_empty() {
        return (
            StatusCode::OK,
            Json(AiResponse {
                response: NO_QUESTION_SENTINEL.to_string(),
            }),
        )
            .into_response();
    }

    let messages = vec![
        ChatMessage::system(format!(
            "You are an AI agent answering questions related to the audio \
             transcription: {}. Only respond to relevant questions.",
            transcription
        )),
        ChatMessage::user(req.text.clone()),
    ];

    let mut deltas = match state.chat.complete(messages).await {
        Ok(rx) => rx,
        Err(e) => {
            error!("Chat completion failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("{}", e),
                }),
            )
                .into_response();
        }
    };

    // Accumulate the streamed deltas into one response string; a stream
    // that dies mid-completion is fatal to the request, never returned as
    // a truncated answer
    let mut response_text = String::new();
    while let Some(delta) = deltas.recv().await {
        match delta {
            Ok(text) => response_text.push_str(&text),
            Err(e) => {
                error!("Chat stream failed mid-response: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: format!("{}", e),
                    }),
                )
                    .into_response();
            }
        }
    }

    info!("Generated response ({} chars)", response_text.len());

    (
        StatusCode::OK,
        Json(AiResponse {
            response: response_text,
        }),
    )
        .into_response()
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
