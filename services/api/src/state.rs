use std::sync::Arc;
use std::time::Duration;

use recite_core::generate::{GeminiGenerator, Generator};
use recite_core::session::SessionStore;
use recite_core::speech::{SpeechBridge, SpeechToText, TextToSpeech};
use recite_core::tutor::Tutor;

use crate::config::Config;
use crate::elevenlabs_adapter::ElevenLabsSpeech;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppContext {
    pub session: Arc<SessionStore>,
    pub tutor: Arc<Tutor>,
    pub transcriber: Option<Arc<dyn SpeechToText>>,
    pub speech: Arc<SpeechBridge>,
}

impl AppContext {
    /// Wires up providers from configuration. Missing keys disable the
    /// provider they belong to rather than failing startup.
    pub fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let generator: Option<Arc<dyn Generator>> = match &config.gemini_api_key {
            Some(key) => Some(Arc::new(GeminiGenerator::new(
                key.clone(),
                config.generation_model.clone(),
                timeout,
            ))),
            None => {
                tracing::warn!(
                    "GEMINI_API_KEY not set, summaries and answers fall back to fixed text"
                );
                None
            }
        };

        let (transcriber, tts): (Option<Arc<dyn SpeechToText>>, Option<Arc<dyn TextToSpeech>>) =
            match &config.elevenlabs_api_key {
                Some(key) => {
                    let provider = Arc::new(ElevenLabsSpeech::new(
                        key.clone(),
                        config.tts_voice_id.clone(),
                        config.tts_model_id.clone(),
                        timeout,
                    ));
                    (Some(provider.clone()), Some(provider))
                }
                None => {
                    tracing::warn!(
                        "ELEVENLABS_API_KEY not set, voice turns run without audio in or out"
                    );
                    (None, None)
                }
            };

        Self {
            session: Arc::new(SessionStore::new()),
            tutor: Arc::new(Tutor::new(generator)),
            transcriber,
            speech: Arc::new(SpeechBridge::new(tts)),
        }
    }
}
