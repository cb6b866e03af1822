//! Text generation behind a trait so the orchestrator can be tested
//! without network access.

use crate::error::ProviderError;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can turn a prompt into text.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// REST client for the Gemini `generateContent` endpoint.
pub struct GeminiGenerator {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    /// `timeout` bounds the whole request; generation can hang for a long
    /// time server-side and a voice turn should fail over to the fallback
    /// answer instead of waiting it out.
    pub fn new(api_key: SecretString, model: impl Into<String>, timeout: Duration) -> Self {
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
            model: model.into(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::CallFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProviderError::CallFailed(e.to_string()))?
            .json::<GenerateResponse>()
            .await
            .map_err(|e| ProviderError::CallFailed(e.to_string()))?;

        resp.text().ok_or(ProviderError::EmptyResponse)
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Best-effort text of the response: first the candidate that finished
    /// normally, then anything found anywhere in the candidate list. A
    /// safety-filtered response legitimately has no text, which is `None`
    /// here, not an error.
    pub fn text(&self) -> Option<String> {
        self.primary_text().or_else(|| self.collected_text())
    }

    fn primary_text(&self) -> Option<String> {
        let candidate = self.candidates.iter().find(|c| {
            c.finish_reason
                .as_deref()
                .map(|r| r == "STOP")
                .unwrap_or(true)
        })?;
        let joined = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();
        if joined.is_empty() { None } else { Some(joined) }
    }

    fn collected_text(&self) -> Option<String> {
        let pieces: Vec<&str> = self
            .candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if pieces.is_empty() {
            None
        } else {
            Some(pieces.join("\n"))
        }
    }
}
