//! Error taxonomies shared across the crate.
//!
//! Extraction and validation errors surface to the uploader as client
//! errors; provider errors are converted to fallback behavior at the
//! boundary where they occur and never reach the student as a failure.

use crate::extract::SourceFormat;
use thiserror::Error;

/// Failures while turning an uploaded file into plain text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("unsupported file format \"{extension}\", upload .txt, .md, .pdf, or .docx")]
    UnsupportedFormat { extension: String },

    #[error("no readable text found in the {format} file")]
    EmptyContent { format: SourceFormat },

    #[error("{format} support is not enabled in this build")]
    DependencyMissing { format: SourceFormat },

    #[error("could not decode the {format} file: {detail}")]
    DecodeFailure { format: SourceFormat, detail: String },
}

/// What a count in [`ValidationError::TooShort`] is counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountUnit {
    Chars,
    Words,
}

impl std::fmt::Display for CountUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountUnit::Chars => f.write_str("characters"),
            CountUnit::Words => f.write_str("words"),
        }
    }
}

/// Reasons content can fail the pre-flight checks in [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("no content found")]
    Empty,

    #[error("content too short: {count} {unit}, need at least {minimum}")]
    TooShort {
        count: usize,
        minimum: usize,
        unit: CountUnit,
    },

    #[error("content too long: {count} characters, maximum is {maximum}")]
    TooLong { count: usize, maximum: usize },

    #[error("transcription may be unclear: average word length {avg_word_len:.1}")]
    LowQuality { avg_word_len: f64 },
}

/// Failures talking to an external model provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("no API credential configured")]
    CredentialMissing,

    #[error("provider call failed: {0}")]
    CallFailed(String),

    #[error("provider returned no usable content")]
    EmptyResponse,
}
