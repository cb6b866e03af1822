use bytes::{Bytes, BytesMut};

pub const DEFAULT_VOICE_ID: &str = "cgSgspJ2msm6clMCkdW9";
pub const DEFAULT_TTS_MODEL: &str = "eleven_turbo_v2";
pub const DEFAULT_OUTPUT_FORMAT: &str = "mp3_44100_128";
pub const DEFAULT_STT_MODEL: &str = "scribe_v1";

// Outgoing

/// One text-to-speech request.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub model_id: String,
    pub output_format: String,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            model_id: DEFAULT_TTS_MODEL.to_string(),
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }

    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

// Incoming

/// Transcription result. `text` is absent or empty when the recognizer
/// heard nothing usable; that is a valid outcome, not an error.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct Transcription {
    pub text: Option<String>,
    pub language_code: Option<String>,
}

/// Audio as a provider hands it back: either one whole buffer or a
/// sequence of chunks, depending on how the response was read.
#[derive(Debug, Clone)]
pub enum AudioPayload {
    Whole(Bytes),
    Chunks(Vec<Bytes>),
}

impl AudioPayload {
    /// Flatten to a single buffer, chunks concatenated in delivered order.
    pub fn into_bytes(self) -> Bytes {
        match self {
            AudioPayload::Whole(bytes) => bytes,
            AudioPayload::Chunks(chunks) => {
                let total = chunks.iter().map(Bytes::len).sum();
                let mut buf = BytesMut::with_capacity(total);
                for chunk in chunks {
                    buf.extend_from_slice(&chunk);
                }
                buf.freeze()
            }
        }
    }
}
