use std::sync::Arc;

use super::document::Document;
use super::language::LanguageProfile;
use super::lsa::{LsaSummarizer, SummaryError};
use crate::config::AppConfig;
use crate::Result;

/// Sentence count used when none is configured
pub const DEFAULT_SENTENCE_COUNT: usize = 3;

/// Characters kept by the truncation fallback
pub const DEFAULT_FALLBACK_CHARS: usize = 500;

const ELLIPSIS: &str = "...";

/// Extractive summarizer with a truncation fallback.
///
/// Holds only immutable, shared resources; one instance can serve any number of
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct Summarizer {
    profile: Arc<LanguageProfile>,
    sentence_count: usize,
    fallback_chars: usize,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::with_profile(LanguageProfile::english())
    }
}

impl Summarizer {
    /// Create a summarizer from configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let profile = LanguageProfile::for_language(&config.summary.language).ok_or_else(|| {
            crate::Error::Config(format!(
                "Unsupported summary language: {}",
                config.summary.language
            ))
        })?;

        Ok(Self {
            profile,
            sentence_count: config.summary.sentence_count.max(1),
            fallback_chars: config.summary.fallback_chars,
        })
    }

    /// Create a summarizer with default settings for a language profile
    pub fn with_profile(profile: Arc<LanguageProfile>) -> Self {
        Self {
            profile,
            sentence_count: DEFAULT_SENTENCE_COUNT,
            fallback_chars: DEFAULT_FALLBACK_CHARS,
        }
    }

    /// Set the default number of summary sentences (minimum 1)
    pub fn with_sentence_count(mut self, count: usize) -> Self {
        self.sentence_count = count.max(1);
        self
    }

    /// Get the configured number of summary sentences
    pub fn sentence_count(&self) -> usize {
        self.sentence_count
    }

    pub fn language(&self) -> &str {
        self.profile.name()
    }

    /// Summarize with the configured sentence count
    pub fn summarize(&self, text: &str) -> String {
        self.summarize_with(text, self.sentence_count)
    }

    /// Summarize to at most `sentence_count` sentences.
    ///
    /// Never fails: when the text cannot be ranked the result is a truncated
    /// copy of the input.
    pub fn summarize_with(&self, text: &str, sentence_count: usize) -> String {
        match self.try_summarize(text, sentence_count) {
            Ok(sentences) => sentences.join(" "),
            Err(e) => {
                if text.trim().is_empty() {
                    tracing::debug!(error = %e, "Nothing to summarize, returning input");
                } else {
                    tracing::warn!(
                        error = %e,
                        chars = text.chars().count(),
                        "Summarization failed, using truncation fallback"
                    );
                }
                truncate(text, self.fallback_chars)
            }
        }
    }

    /// Extract summary sentences, surfacing ranking failures
    pub fn try_summarize(
        &self,
        text: &str,
        sentence_count: usize,
    ) -> std::result::Result<Vec<String>, SummaryError> {
        let document = Document::parse(text, self.profile.tokenizer());
        let selected = LsaSummarizer::new(&self.profile).summarize(&document, sentence_count.max(1))?;
        Ok(selected.into_iter().map(|s| s.text.clone()).collect())
    }
}

/// Summarize English text with default settings
pub fn summarize(text: &str, sentence_count: usize) -> String {
    Summarizer::default().summarize_with(text, sentence_count)
}

/// First `max_chars` characters followed by `...` when the text is longer
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
