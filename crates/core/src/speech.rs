//! Speech provider seams and the synthesis bridge.

use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;

use crate::error::ProviderError;

/// Turns recorded audio into a transcript.
///
/// A provider response without a text field is a valid empty transcript
/// (`Ok("")`), not an error; the orchestrator treats silence as its own
/// case.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: Bytes, filename: &str) -> Result<String, ProviderError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Bytes, ProviderError>;
}

/// Wraps an optional synthesizer so callers always get bytes back.
/// No synthesizer, empty input, or a failed call all yield an empty
/// buffer; clients treat that as "voice unavailable" and the text answer
/// still stands on its own.
pub struct SpeechBridge {
    tts: Option<Arc<dyn TextToSpeech>>,
}

impl SpeechBridge {
    pub fn new(tts: Option<Arc<dyn TextToSpeech>>) -> Self {
        Self { tts }
    }

    pub fn is_enabled(&self) -> bool {
        self.tts.is_some()
    }

    pub async fn speak(&self, text: &str) -> Bytes {
        if text.trim().is_empty() {
            return Bytes::new();
        }
        let Some(tts) = &self.tts else {
            return Bytes::new();
        };
        match tts.synthesize(text).await {
            Ok(audio) => audio,
            Err(err) => {
                tracing::warn!(error = %err, "speech synthesis failed, responding without audio");
                Bytes::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_audio_through() {
        let mut tts = MockTextToSpeech::new();
        tts.expect_synthesize()
            .withf(|text| text == "hello there")
            .times(1)
            .returning(|_| Ok(Bytes::from_static(b"mp3-bytes")));

        let bridge = SpeechBridge::new(Some(Arc::new(tts)));
        let audio = bridge.speak("hello there").await;
        assert_eq!(audio, Bytes::from_static(b"mp3-bytes"));
    }

    #[tokio::test]
    async fn missing_synthesizer_yields_empty_bytes() {
        let bridge = SpeechBridge::new(None);
        let audio = bridge.speak("hello there").await;
        assert!(audio.is_empty());
        assert!(!bridge.is_enabled());
    }

    #[tokio::test]
    async fn provider_failure_yields_empty_bytes() {
        let mut tts = MockTextToSpeech::new();
        tts.expect_synthesize()
            .times(1)
            .returning(|_| Err(ProviderError::CallFailed("boom".to_string())));

        let bridge = SpeechBridge::new(Some(Arc::new(tts)));
        let audio = bridge.speak("hello there").await;
        assert!(audio.is_empty());
    }

    #[tokio::test]
    async fn empty_text_skips_the_provider() {
        // No expectations set: a call would panic the mock.
        let tts = MockTextToSpeech::new();
        let bridge = SpeechBridge::new(Some(Arc::new(tts)));
        let audio = bridge.speak("   ").await;
        assert!(audio.is_empty());
    }
}
