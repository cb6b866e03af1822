//! Adapts the ElevenLabs client to the speech seams the tutoring core
//! expects.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use secrecy::SecretString;

use elevenlabs_speech::{SpeechClient, SynthesisRequest};
use recite_core::speech::{SpeechToText, TextToSpeech};
use recite_core::ProviderError;

pub struct ElevenLabsSpeech {
    client: SpeechClient,
    voice_id: String,
    model_id: String,
}

impl ElevenLabsSpeech {
    pub fn new(
        api_key: SecretString,
        voice_id: String,
        model_id: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client: SpeechClient::with_timeout(api_key, timeout),
            voice_id,
            model_id,
        }
    }
}

#[async_trait]
impl SpeechToText for ElevenLabsSpeech {
    async fn transcribe(&self, audio: Bytes, filename: &str) -> Result<String, ProviderError> {
        let transcription = self
            .client
            .transcribe(audio, filename)
            .await
            .map_err(|e| ProviderError::CallFailed(format!("{e:#}")))?;
        // A response without text is valid silence, not a failure.
        Ok(transcription.text.unwrap_or_default())
    }
}

#[async_trait]
impl TextToSpeech for ElevenLabsSpeech {
    async fn synthesize(&self, text: &str) -> Result<Bytes, ProviderError> {
        let request = SynthesisRequest::new(text)
            .with_voice(&self.voice_id)
            .with_model(&self.model_id);
        self.client
            .synthesize(&request)
            .await
            .map_err(|e| ProviderError::CallFailed(format!("{e:#}")))
    }
}
