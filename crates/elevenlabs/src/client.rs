use crate::types::{AudioPayload, DEFAULT_STT_MODEL, SynthesisRequest, Transcription};
use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

pub const ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the ElevenLabs speech-to-text and text-to-speech
/// endpoints.
pub struct SpeechClient {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl SpeechClient {
    pub fn new(api_key: SecretString) -> Self {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: SecretString, timeout: Duration) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "failed to build HTTP client, using defaults");
                Client::new()
            });
        Self {
            client,
            api_key,
            base_url: ELEVENLABS_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Transcribe recorded audio with the scribe model. The filename is
    /// only a content-type hint for the upload.
    pub async fn transcribe(&self, audio: Bytes, filename: &str) -> Result<Transcription> {
        let part = Part::stream(audio)
            .file_name(filename.to_string())
            .mime_str(guess_mime(filename))
            .context("invalid content type for audio upload")?;
        let form = Form::new()
            .part("file", part)
            .text("model_id", DEFAULT_STT_MODEL)
            .text("language_code", "eng");

        let resp = self
            .client
            .post(format!("{}/v1/speech-to-text", self.base_url))
            .header("xi-api-key", self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .context("speech-to-text request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("speech-to-text returned {status}: {detail}");
        }
        resp.json::<Transcription>()
            .await
            .context("could not parse transcription response")
    }

    /// Synthesize speech for the given text. The response body arrives as
    /// an HTTP chunk stream; it is collected and normalized to one buffer.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<Bytes> {
        let url = format!(
            "{}/v1/text-to-speech/{}?output_format={}",
            self.base_url, request.voice_id, request.output_format
        );
        let body = serde_json::json!({
            "text": request.text,
            "model_id": request.model_id,
        });

        let mut resp = self
            .client
            .post(url)
            .header("xi-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("text-to-speech request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            anyhow::bail!("text-to-speech returned {status}: {detail}");
        }

        let mut chunks = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .context("failed reading audio stream")?
        {
            chunks.push(chunk);
        }
        Ok(AudioPayload::Chunks(chunks).into_bytes())
    }
}

fn guess_mime(filename: &str) -> &'static str {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        _ => "audio/webm",
    }
}
