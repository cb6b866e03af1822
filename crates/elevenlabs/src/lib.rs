pub mod client;
pub mod types;

pub use client::{ELEVENLABS_BASE_URL, SpeechClient};
pub use types::{AudioPayload, SynthesisRequest, Transcription};
