//! Pre-flight checks for uploaded notes and voice transcripts.
//!
//! Everything in here is a pure function of its input text; callers decide
//! what to do with an `Invalid` outcome (the upload path rejects, the voice
//! path only annotates).

use crate::error::{CountUnit, ValidationError};
use serde::Serialize;

pub const MIN_DOCUMENT_CHARS: usize = 50;
pub const MIN_DOCUMENT_WORDS: usize = 10;
pub const MAX_DOCUMENT_CHARS: usize = 100_000;

const PREVIEW_CHARS: usize = 200;
const READING_WORDS_PER_MINUTE: usize = 200;

const MIN_TRANSCRIPT_WORDS: usize = 3;
const BRIEF_TRANSCRIPT_WORDS: usize = 10;
const GOOD_TRANSCRIPT_WORDS: usize = 20;
const MIN_AVG_WORD_LEN: f64 = 2.0;

/// Outcome of a validation check, for both documents and transcripts.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation<M> {
    Valid(M),
    Invalid {
        reason: ValidationError,
        suggestion: Option<String>,
    },
}

impl<M> Validation<M> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    fn invalid(reason: ValidationError, suggestion: Option<&str>) -> Self {
        Validation::Invalid {
            reason,
            suggestion: suggestion.map(str::to_string),
        }
    }
}

pub type DocumentValidation = Validation<DocumentMetrics>;
pub type TranscriptValidation = Validation<TranscriptMetrics>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetrics {
    pub word_count: usize,
    pub char_count: usize,
    pub line_count: usize,
    /// Minutes at 200 words per minute, rounded to one decimal.
    pub estimated_reading_time: f64,
    pub content_preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptMetrics {
    pub word_count: usize,
    pub quality: TranscriptQuality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptQuality {
    Good,
    Acceptable,
}

/// Check extracted notes before they are accepted into the session.
pub fn validate_document(text: &str) -> DocumentValidation {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Validation::invalid(
            ValidationError::Empty,
            Some("Please upload a file with content."),
        );
    }

    // Unicode scalars, not bytes, so multibyte notes are not undercounted.
    let char_count = trimmed.chars().count();
    let word_count = trimmed.split_whitespace().count();

    if char_count < MIN_DOCUMENT_CHARS {
        return Validation::Invalid {
            reason: ValidationError::TooShort {
                count: char_count,
                minimum: MIN_DOCUMENT_CHARS,
                unit: CountUnit::Chars,
            },
            suggestion: Some(format!(
                "Please upload a file with at least {MIN_DOCUMENT_CHARS} characters of study material."
            )),
        };
    }
    if word_count < MIN_DOCUMENT_WORDS {
        return Validation::Invalid {
            reason: ValidationError::TooShort {
                count: word_count,
                minimum: MIN_DOCUMENT_WORDS,
                unit: CountUnit::Words,
            },
            suggestion: Some(format!(
                "Please upload a file with at least {MIN_DOCUMENT_WORDS} words."
            )),
        };
    }
    if char_count > MAX_DOCUMENT_CHARS {
        return Validation::Invalid {
            reason: ValidationError::TooLong {
                count: char_count,
                maximum: MAX_DOCUMENT_CHARS,
            },
            suggestion: Some(format!(
                "Please keep uploads under {MAX_DOCUMENT_CHARS} characters."
            )),
        };
    }

    let line_count = trimmed.lines().filter(|l| !l.trim().is_empty()).count();
    let estimated_reading_time =
        round_one_decimal(word_count as f64 / READING_WORDS_PER_MINUTE as f64);

    Validation::Valid(DocumentMetrics {
        word_count,
        char_count,
        line_count,
        estimated_reading_time,
        content_preview: preview(trimmed),
    })
}

/// Check a voice transcript. Short answers get a nudge, and a sub-2.0
/// average word length usually means the recognizer produced fragments.
pub fn validate_transcript(text: &str) -> TranscriptValidation {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Validation::invalid(ValidationError::Empty, Some("Please try speaking again."));
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    let word_count = words.len();

    if word_count < MIN_TRANSCRIPT_WORDS {
        return Validation::invalid(
            ValidationError::TooShort {
                count: word_count,
                minimum: BRIEF_TRANSCRIPT_WORDS,
                unit: CountUnit::Words,
            },
            None,
        );
    }
    if word_count < BRIEF_TRANSCRIPT_WORDS {
        return Validation::invalid(
            ValidationError::TooShort {
                count: word_count,
                minimum: BRIEF_TRANSCRIPT_WORDS,
                unit: CountUnit::Words,
            },
            Some(
                "Try explaining it as if you were teaching it to someone who has never heard of it before.",
            ),
        );
    }

    let total_word_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let avg_word_len = total_word_chars as f64 / word_count as f64;
    if avg_word_len < MIN_AVG_WORD_LEN {
        return Validation::invalid(
            ValidationError::LowQuality { avg_word_len },
            Some("Speak at a moderate pace in a quiet environment."),
        );
    }

    let quality = if word_count >= GOOD_TRANSCRIPT_WORDS {
        TranscriptQuality::Good
    } else {
        TranscriptQuality::Acceptable
    };
    Validation::Valid(TranscriptMetrics {
        word_count,
        quality,
    })
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut p: String = text.chars().take(PREVIEW_CHARS).collect();
    p.push_str("...");
    p
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["concept"; n].join(" ")
    }

    #[test]
    fn empty_document_is_invalid() {
        let result = validate_document("   \n\t  ");
        assert!(matches!(
            result,
            Validation::Invalid {
                reason: ValidationError::Empty,
                ..
            }
        ));
    }

    #[test]
    fn short_document_names_the_char_floor() {
        let result = validate_document("too short");
        match result {
            Validation::Invalid {
                reason:
                    ValidationError::TooShort {
                        count,
                        minimum,
                        unit,
                    },
                suggestion,
            } => {
                assert_eq!(count, 9);
                assert_eq!(minimum, MIN_DOCUMENT_CHARS);
                assert_eq!(unit, CountUnit::Chars);
                assert!(suggestion.unwrap().contains("50 characters"));
            }
            other => panic!("expected char-floor rejection, got {other:?}"),
        }
    }

    #[test]
    fn document_with_too_few_words_names_the_word_floor() {
        // Clears the 50-char floor with only 4 words.
        let text = "Supercalifragilistic expialidocious pneumonoultramicroscopic notes";
        assert!(text.chars().count() >= MIN_DOCUMENT_CHARS);
        let result = validate_document(text);
        match result {
            Validation::Invalid {
                reason: ValidationError::TooShort { count, unit, .. },
                ..
            } => {
                assert_eq!(count, 4);
                assert_eq!(unit, CountUnit::Words);
            }
            other => panic!("expected word-floor rejection, got {other:?}"),
        }
    }

    #[test]
    fn oversized_document_is_too_long() {
        let text = words(30_000); // 239_999 chars
        let result = validate_document(&text);
        match result {
            Validation::Invalid {
                reason: ValidationError::TooLong { count, maximum },
                ..
            } => {
                assert!(count > MAX_DOCUMENT_CHARS);
                assert_eq!(maximum, MAX_DOCUMENT_CHARS);
            }
            other => panic!("expected too-long rejection, got {other:?}"),
        }
    }

    #[test]
    fn document_at_the_boundaries_is_valid() {
        // Exactly 10 words and comfortably over 50 chars.
        let text = "The Krebs cycle produces ATP inside the mitochondrial matrix today";
        let result = validate_document(text);
        assert!(result.is_valid(), "got {result:?}");
    }

    #[test]
    fn valid_document_reports_metrics() {
        let text = format!("line one of the notes\n\nline two of the notes\n{}", words(390));
        let result = validate_document(&text);
        match result {
            Validation::Valid(metrics) => {
                assert_eq!(metrics.word_count, 400);
                assert_eq!(metrics.line_count, 3);
                assert_eq!(metrics.estimated_reading_time, 2.0);
                assert!(metrics.content_preview.ends_with("..."));
                assert_eq!(metrics.content_preview.chars().count(), 203);
            }
            other => panic!("expected valid document, got {other:?}"),
        }
    }

    #[test]
    fn short_document_preview_is_untruncated() {
        let text = "Mitochondria convert glucose into usable chemical energy for the cell.";
        match validate_document(text) {
            Validation::Valid(metrics) => {
                assert_eq!(metrics.content_preview, text);
            }
            other => panic!("expected valid document, got {other:?}"),
        }
    }

    #[test]
    fn char_count_uses_unicode_scalars() {
        let text = "émission déférence préférée naïveté citroën déjà vu räson woche gärten";
        match validate_document(text) {
            Validation::Valid(metrics) => {
                assert_eq!(metrics.char_count, text.chars().count());
                assert!(metrics.char_count < text.len());
            }
            other => panic!("expected valid document, got {other:?}"),
        }
    }

    #[test]
    fn reading_time_rounds_to_one_decimal() {
        let text = words(240);
        match validate_document(&text) {
            Validation::Valid(metrics) => assert_eq!(metrics.estimated_reading_time, 1.2),
            other => panic!("expected valid document, got {other:?}"),
        }
    }

    #[test]
    fn empty_transcript_is_invalid() {
        let result = validate_transcript("  ");
        assert!(matches!(
            result,
            Validation::Invalid {
                reason: ValidationError::Empty,
                ..
            }
        ));
    }

    #[test]
    fn tiny_transcript_has_no_suggestion() {
        let result = validate_transcript("um okay");
        match result {
            Validation::Invalid {
                reason: ValidationError::TooShort { count, .. },
                suggestion,
            } => {
                assert_eq!(count, 2);
                assert!(suggestion.is_none());
            }
            other => panic!("expected too-short rejection, got {other:?}"),
        }
    }

    #[test]
    fn brief_transcript_gets_a_teaching_suggestion() {
        let result = validate_transcript("photosynthesis turns light into sugar");
        match result {
            Validation::Invalid {
                reason: ValidationError::TooShort { count, .. },
                suggestion,
            } => {
                assert_eq!(count, 5);
                assert!(suggestion.unwrap().contains("teaching it to someone"));
            }
            other => panic!("expected brief rejection, got {other:?}"),
        }
    }

    #[test]
    fn fragmented_transcript_is_low_quality() {
        let result = validate_transcript("a b c d e f g h i j k l");
        match result {
            Validation::Invalid {
                reason: ValidationError::LowQuality { avg_word_len },
                suggestion,
            } => {
                assert_eq!(avg_word_len, 1.0);
                assert!(suggestion.is_some());
            }
            other => panic!("expected low-quality rejection, got {other:?}"),
        }
    }

    #[test]
    fn ten_word_transcript_is_acceptable() {
        let result = validate_transcript(&words(10));
        match result {
            Validation::Valid(metrics) => {
                assert_eq!(metrics.word_count, 10);
                assert_eq!(metrics.quality, TranscriptQuality::Acceptable);
            }
            other => panic!("expected valid transcript, got {other:?}"),
        }
    }

    #[test]
    fn twenty_word_transcript_is_good() {
        let result = validate_transcript(&words(20));
        match result {
            Validation::Valid(metrics) => {
                assert_eq!(metrics.quality, TranscriptQuality::Good);
            }
            other => panic!("expected valid transcript, got {other:?}"),
        }
    }
}
