//! The tutoring loop: decides what to say back for each spoken turn and
//! produces the notes summary at upload time.
//!
//! Provider trouble is absorbed here. Whatever the generator does, `reply`
//! and `summarize` always hand back usable text for the student.

use std::sync::Arc;

use crate::error::ProviderError;
use crate::generate::Generator;
use crate::session::NotesSnapshot;

pub const NO_SPEECH_MESSAGE: &str =
    "I couldn't quite hear that. Try speaking a bit more clearly or closer to the mic.";
pub const MISSING_NOTES_MESSAGE: &str =
    "Please upload your study notes first so I can quiz you and explain things in context.";
pub const NO_GENERATOR_MESSAGE: &str = "I don't have access to the language model right now, \
     but based on your notes, try explaining the main idea in your own words. I'll help you refine it.";
pub const EMPTY_ANSWER_MESSAGE: &str = "I couldn't generate a reply that time. \
     Try rephrasing your question, or explain the idea again in your own words.";
pub const GENERATION_FAILED_MESSAGE: &str = "I ran into an issue generating a reply, \
     but let's still practice: explain the main point of your notes in one or two sentences.";
pub const NO_SUMMARY_NOTICE: &str = "I loaded your notes successfully, but I couldn't \
     auto-summarize them. I'll still use them to quiz you.";

/// How much of the notes the summarization prompt may carry.
const SUMMARY_INPUT_CHARS: usize = 6_000;
/// Length of the raw-notes slice used when summarization is unavailable.
const FALLBACK_SUMMARY_CHARS: usize = 1_000;

#[derive(Debug, Clone, PartialEq)]
pub struct TutorReply {
    pub answer: String,
    pub path: ResponsePath,
}

/// Which branch of the turn decision produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePath {
    NoSpeech,
    MissingNotes,
    Generated,
    Fallback,
}

pub struct Tutor {
    generator: Option<Arc<dyn Generator>>,
}

impl Tutor {
    pub fn new(generator: Option<Arc<dyn Generator>>) -> Self {
        Self { generator }
    }

    /// Respond to one spoken turn.
    ///
    /// Checked in order: silence, then missing notes, then a single
    /// generation attempt over (summary, transcript). The earlier branches
    /// never touch the generator.
    pub async fn reply(&self, transcript: &str, notes: Option<&NotesSnapshot>) -> TutorReply {
        if transcript.trim().is_empty() {
            return TutorReply {
                answer: NO_SPEECH_MESSAGE.to_string(),
                path: ResponsePath::NoSpeech,
            };
        }

        let summary = notes
            .map(|n| n.summary.trim())
            .filter(|s| !s.is_empty());
        let Some(summary) = summary else {
            return TutorReply {
                answer: MISSING_NOTES_MESSAGE.to_string(),
                path: ResponsePath::MissingNotes,
            };
        };

        let Some(generator) = &self.generator else {
            tracing::warn!("no generator configured, answering with fixed guidance");
            return TutorReply {
                answer: NO_GENERATOR_MESSAGE.to_string(),
                path: ResponsePath::Fallback,
            };
        };

        match generator.generate(&answer_prompt(summary, transcript)).await {
            Ok(text) if !text.trim().is_empty() => TutorReply {
                answer: text.trim().to_string(),
                path: ResponsePath::Generated,
            },
            Ok(_) | Err(ProviderError::EmptyResponse) => {
                tracing::warn!("generation produced no text, answering with fixed guidance");
                TutorReply {
                    answer: EMPTY_ANSWER_MESSAGE.to_string(),
                    path: ResponsePath::Fallback,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "generation failed, answering with fixed guidance");
                TutorReply {
                    answer: GENERATION_FAILED_MESSAGE.to_string(),
                    path: ResponsePath::Fallback,
                }
            }
        }
    }

    /// Summarize uploaded notes. Never fails: without a generator, or when
    /// the call errors, the summary is the leading slice of the raw notes;
    /// a generation with no text becomes a fixed notice. Either way the
    /// session ends up with a summary derived from the new upload.
    pub async fn summarize(&self, notes_text: &str) -> String {
        let Some(generator) = &self.generator else {
            return truncate_chars(notes_text, FALLBACK_SUMMARY_CHARS);
        };

        match generator.generate(&summary_prompt(notes_text)).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) | Err(ProviderError::EmptyResponse) => {
                tracing::warn!("summarization produced no text, keeping a fixed notice");
                NO_SUMMARY_NOTICE.to_string()
            }
            Err(err) => {
                tracing::warn!(error = %err, "summarization failed, falling back to raw notes");
                truncate_chars(notes_text, FALLBACK_SUMMARY_CHARS)
            }
        }
    }
}

fn summary_prompt(notes_text: &str) -> String {
    format!(
        "You are a friendly tutor. Summarize the following study notes in 5-7 short bullet \
         points, paraphrasing everything in your own words. Do not copy long phrases directly; \
         keep it short and study-friendly.\n\nNotes:\n{}",
        truncate_chars(notes_text, SUMMARY_INPUT_CHARS)
    )
}

fn answer_prompt(summary: &str, transcript: &str) -> String {
    format!(
        "You are an AI study partner. The student is practicing the Feynman Technique.\n\n\
         They uploaded notes, summarized here:\n---\n{summary}\n---\n\n\
         The student just said (transcribed from voice):\n\"{transcript}\"\n\n\
         Be a friendly tutor: respond conversationally, correct any misunderstanding gently, \
         and end with ONE short follow-up question that checks their understanding. \
         Keep it under 120 words."
    )
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}
