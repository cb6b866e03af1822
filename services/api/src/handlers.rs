//! HTTP handlers for the study session endpoints.

use axum::extract::{Multipart, State};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::Serialize;

use recite_core::extract::extract;
use recite_core::session::NotesSnapshot;
use recite_core::validate::{
    DocumentMetrics, TranscriptQuality, Validation, validate_document, validate_transcript,
};

use crate::error::ApiError;
use crate::state::AppContext;

pub const SPEECH_UNAVAILABLE_MESSAGE: &str = "Speech recognition isn't available right now, \
     so I couldn't hear your question. Please try again later.";

/// Upload response previews are capped at this many characters.
const SUMMARY_PREVIEW_CHARS: usize = 200;

#[derive(Serialize)]
pub struct LivenessResponse {
    message: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    module: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct UploadResponse {
    status: &'static str,
    notes_length: usize,
    summary_preview: String,
    stats: DocumentMetrics,
}

#[derive(Serialize)]
pub struct VoiceTurnResponse {
    transcript: String,
    answer: String,
    audio_base64: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    transcript_quality: Option<TranscriptQuality>,
}

pub async fn root() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: "Backend is up :)",
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Accepts a notes file, extracts and validates its text, then swaps the
/// session over to the new material.
pub async fn upload_notes(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let (filename, bytes) = read_file_field(&mut multipart).await?;
    tracing::info!(filename = %filename, size = bytes.len(), "received notes upload");

    // Parsing PDFs and DOCX archives is CPU work; keep it off the I/O
    // threads.
    let content = tokio::task::spawn_blocking(move || extract(&bytes, &filename))
        .await
        .map_err(|e| anyhow::anyhow!("extraction task failed: {e}"))??;
    tracing::info!(
        format = %content.format,
        chars = content.text.chars().count(),
        pages = content.pages,
        paragraphs = content.paragraphs,
        tables = content.tables,
        "extracted notes text"
    );

    let stats = match validate_document(&content.text) {
        Validation::Valid(stats) => stats,
        Validation::Invalid { reason, suggestion } => {
            return Err(ApiError::InvalidDocument { reason, suggestion });
        }
    };

    let summary = ctx.tutor.summarize(&content.text).await;
    let summary_preview = truncate_chars(&summary, SUMMARY_PREVIEW_CHARS);
    let notes_length = content.text.chars().count();

    ctx.session
        .replace(NotesSnapshot {
            raw_text: content.text,
            summary,
            filename: content.filename,
            word_count: stats.word_count,
        })
        .await;

    Ok(Json(UploadResponse {
        status: "ok",
        notes_length,
        summary_preview,
        stats,
    }))
}

/// One spoken turn: transcribe the audio, ask the tutor for an answer, and
/// synthesize it back. Provider trouble downgrades the turn instead of
/// failing it.
pub async fn voice_turn(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Json<VoiceTurnResponse>, ApiError> {
    let (filename, audio) = read_file_field(&mut multipart).await?;
    tracing::info!(filename = %filename, size = audio.len(), "received voice turn audio");

    let Some(transcriber) = &ctx.transcriber else {
        tracing::warn!("no transcriber configured, voice turn answered with fixed guidance");
        let answer = SPEECH_UNAVAILABLE_MESSAGE.to_string();
        let audio_out = ctx.speech.speak(&answer).await;
        return Ok(Json(VoiceTurnResponse {
            transcript: String::new(),
            answer,
            audio_base64: BASE64.encode(&audio_out),
            transcript_quality: None,
        }));
    };

    let transcript = match transcriber.transcribe(audio, &filename).await {
        Ok(text) => text,
        Err(err) => {
            // A failed transcription plays out as silence; the tutor already
            // has a line for that.
            tracing::warn!(error = %err, "transcription failed, treating turn as silence");
            String::new()
        }
    };

    let transcript_quality = match validate_transcript(&transcript) {
        Validation::Valid(metrics) => {
            tracing::debug!(words = metrics.word_count, quality = ?metrics.quality, "transcript accepted");
            Some(metrics.quality)
        }
        Validation::Invalid { reason, .. } => {
            tracing::debug!(reason = %reason, "transcript below quality floor");
            None
        }
    };

    let notes = ctx.session.snapshot().await;
    let reply = ctx.tutor.reply(&transcript, notes.as_deref()).await;
    tracing::info!(path = ?reply.path, "voice turn answered");

    let audio_out = ctx.speech.speak(&reply.answer).await;

    Ok(Json(VoiceTurnResponse {
        transcript,
        answer: reply.answer,
        audio_base64: BASE64.encode(&audio_out),
        transcript_quality,
    }))
}

/// Pulls the uploaded file out of the multipart body. The field is matched
/// by its `file` name or by carrying a filename, whichever comes first.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") && field.file_name().is_none() {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await?;
        return Ok((filename, bytes));
    }
    Err(ApiError::BadRequest(
        "missing file field in multipart body".to_string(),
    ))
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    text.chars().take(limit).collect()
}
