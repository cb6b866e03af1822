use secrecy::SecretString;
use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
///
/// Provider API keys are optional on purpose: a missing key disables that
/// provider and the affected feature degrades to its fallback instead of
/// refusing to start.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub gemini_api_key: Option<SecretString>,
    pub elevenlabs_api_key: Option<SecretString>,
    pub generation_model: String,
    pub tts_voice_id: String,
    pub tts_model_id: String,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// This function will look for a `.env` file in the current directory
    /// and load the following variables:
    ///
    /// *   `BIND_ADDRESS`: The address and port to bind the server to. Defaults to "0.0.0.0:8787".
    /// *   `GEMINI_API_KEY`: (Optional) Key used for note summaries and tutoring answers.
    /// *   `ELEVENLABS_API_KEY`: (Optional) Key used for transcription and speech synthesis.
    /// *   `GENERATION_MODEL`: (Optional) Gemini model id. Defaults to "gemini-flash-latest".
    /// *   `TTS_VOICE_ID`: (Optional) ElevenLabs voice. Defaults to the stock study-partner voice.
    /// *   `TTS_MODEL_ID`: (Optional) ElevenLabs TTS model. Defaults to "eleven_turbo_v2".
    /// *   `REQUEST_TIMEOUT_SECS`: (Optional) Per-call provider timeout. Defaults to 30.
    /// *   `MAX_UPLOAD_BYTES`: (Optional) Request body ceiling. Defaults to 20 MiB.
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8787".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let gemini_api_key = secret_var("GEMINI_API_KEY");
        let elevenlabs_api_key = secret_var("ELEVENLABS_API_KEY");

        let generation_model = std::env::var("GENERATION_MODEL")
            .unwrap_or_else(|_| "gemini-flash-latest".to_string());
        let tts_voice_id = std::env::var("TTS_VOICE_ID")
            .unwrap_or_else(|_| elevenlabs_speech::types::DEFAULT_VOICE_ID.to_string());
        let tts_model_id = std::env::var("TTS_MODEL_ID")
            .unwrap_or_else(|_| elevenlabs_speech::types::DEFAULT_TTS_MODEL.to_string());

        let request_timeout_secs = integer_var("REQUEST_TIMEOUT_SECS", 30)?;
        let max_upload_bytes = integer_var("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            gemini_api_key,
            elevenlabs_api_key,
            generation_model,
            tts_voice_id,
            tts_model_id,
            request_timeout_secs,
            max_upload_bytes,
            log_level,
        })
    }
}

/// Read a key-shaped variable; blank values count as unset.
fn secret_var(name: &str) -> Option<SecretString> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

fn integer_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), value)),
        Err(_) => Ok(default),
    }
}
