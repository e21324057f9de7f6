//! Language resources for summarization
//!
//! Tokenization, stemming and stop-word filtering sit behind narrow traits so a
//! profile for another language can be plugged in without touching the ranking
//! code. The English profile is built once per process and shared read-only.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};

/// Splits text into sentences and sentences into words
pub trait Tokenizer: Send + Sync {
    /// Split a run of prose into sentences, trimmed, in document order
    fn sentences(&self, text: &str) -> Vec<String>;

    /// Split a sentence into word tokens (punctuation and numbers dropped)
    fn words(&self, sentence: &str) -> Vec<String>;
}

/// Reduces a normalized word to its root form
pub trait WordStemmer: Send + Sync {
    fn stem(&self, word: &str) -> String;
}

/// Abbreviations that end with a period but do not end a sentence
const ENGLISH_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "no", "fig", "figs",
    "e.g", "i.e", "cf", "al", "approx", "dept", "est", "inc", "ltd", "co", "corp", "gen",
    "gov", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov",
    "dec", "u.s", "u.k", "a.m", "p.m", "vol", "ed", "eds", "pp", "ph.d",
];

/// Characters that may trail a terminator and still belong to the sentence
const CLOSING_CHARS: &[char] = &['"', '\'', ')', ']', '}', '\u{201d}', '\u{2019}', '\u{bb}'];

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\u{2026}')
}

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| {
        Regex::new(r"\p{L}[\p{L}\p{M}'\u{2019}-]*").expect("word pattern is a valid regex")
    })
}

/// Rule-based English tokenizer
///
/// Sentences end at `.`, `!`, `?` or an ellipsis followed by whitespace. A run of
/// periods does not end a sentence when the next word starts in lower case, and
/// a single period does not end one after a known abbreviation or an initial.
#[derive(Debug, Default, Clone)]
pub struct EnglishTokenizer;

impl EnglishTokenizer {
    /// Whether the period at `dot` (byte index) closes an abbreviation or an initial
    fn is_abbreviation(text: &str, dot: usize) -> bool {
        let before = &text[..dot];
        let token = before
            .rsplit(|c: char| c.is_whitespace() || c == '(' || c == '"')
            .next()
            .unwrap_or("");
        if token.is_empty() {
            return false;
        }

        let mut letters = token.chars().filter(|c| c.is_alphabetic());
        let single_initial = matches!((letters.next(), letters.next()), (Some(c), None) if c.is_uppercase())
            && token.chars().count() == 1;
        if single_initial {
            return true;
        }

        let lowered = token.to_lowercase();
        ENGLISH_ABBREVIATIONS.contains(&lowered.as_str())
    }

    fn next_word_starts_lowercase(rest: &str) -> bool {
        rest.trim_start()
            .chars()
            .find(|c| !CLOSING_CHARS.contains(c) && *c != '(' && *c != '"')
            .map(|c| c.is_lowercase())
            .unwrap_or(false)
    }
}

impl Tokenizer for EnglishTokenizer {
    fn sentences(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            if !is_terminator(c) {
                continue;
            }

            let mut end = idx + c.len_utf8();
            let mut saw_only_periods = c == '.';
            while let Some(&(next_idx, next)) = chars.peek() {
                if is_terminator(next) {
                    saw_only_periods &= next == '.';
                    end = next_idx + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            while let Some(&(next_idx, next)) = chars.peek() {
                if CLOSING_CHARS.contains(&next) {
                    end = next_idx + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }

            let at_boundary = match chars.peek() {
                None => true,
                Some(&(_, next)) => next.is_whitespace(),
            };
            if !at_boundary {
                continue;
            }

            if saw_only_periods {
                let single_period = text[idx..end].trim_end_matches(CLOSING_CHARS) == ".";
                if (single_period && Self::is_abbreviation(text, idx))
                    || Self::next_word_starts_lowercase(&text[end..])
                {
                    continue;
                }
            }

            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = end;
        }

        let tail = text[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }

        sentences
    }

    fn words(&self, sentence: &str) -> Vec<String> {
        word_pattern()
            .find_iter(sentence)
            .map(|m| m.as_str().trim_end_matches(['\'', '\u{2019}', '-']))
            .filter(|w| !w.is_empty())
            .map(|w| w.to_string())
            .collect()
    }
}

/// Snowball stemmer from `rust-stemmers`
pub struct SnowballStemmer {
    inner: Stemmer,
}

impl SnowballStemmer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            inner: Stemmer::create(algorithm),
        }
    }
}

impl WordStemmer for SnowballStemmer {
    fn stem(&self, word: &str) -> String {
        self.inner.stem(word).into_owned()
    }
}

/// Tokenizer, stemmer and stop words for one language
pub struct LanguageProfile {
    name: String,
    tokenizer: Box<dyn Tokenizer>,
    stemmer: Box<dyn WordStemmer>,
    stop_words: HashSet<String>,
}

impl std::fmt::Debug for LanguageProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageProfile")
            .field("name", &self.name)
            .field("stop_words", &self.stop_words.len())
            .finish()
    }
}

impl LanguageProfile {
    /// Build a profile from custom parts
    pub fn new(
        name: impl Into<String>,
        tokenizer: Box<dyn Tokenizer>,
        stemmer: Box<dyn WordStemmer>,
        stop_words: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            name: name.into(),
            tokenizer,
            stemmer,
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// The shared English profile
    pub fn english() -> Arc<LanguageProfile> {
        static ENGLISH: OnceLock<Arc<LanguageProfile>> = OnceLock::new();
        ENGLISH
            .get_or_init(|| {
                Arc::new(LanguageProfile::new(
                    "english",
                    Box::new(EnglishTokenizer),
                    Box::new(SnowballStemmer::new(Algorithm::English)),
                    get(LANGUAGE::English).iter().map(|w| w.to_string()),
                ))
            })
            .clone()
    }

    /// Look up a built-in profile by name
    pub fn for_language(language: &str) -> Option<Arc<LanguageProfile>> {
        match language.trim().to_lowercase().as_str() {
            "english" | "en" => Some(Self::english()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    /// Lowercase a raw token
    pub fn normalize(&self, word: &str) -> String {
        word.to_lowercase()
    }

    pub fn is_stop_word(&self, normalized: &str) -> bool {
        self.stop_words.contains(normalized)
    }

    /// Normalize then stem a raw token
    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(&self.normalize(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_split_basic() {
        let tokenizer = EnglishTokenizer;
        let sentences =
            tokenizer.sentences("Sentence one. Sentence two! Is this three? Sentence four.");
        assert_eq!(
            sentences,
            vec!["Sentence one.", "Sentence two!", "Is this three?", "Sentence four."]
        );
    }

    #[test]
    fn test_sentence_split_keeps_abbreviations() {
        let tokenizer = EnglishTokenizer;
        let sentences = tokenizer
            .sentences("Dr. Smith met Mr. Jones at 5 p.m. yesterday. They talked about J. Doe.");
        assert_eq!(
            sentences,
            vec![
                "Dr. Smith met Mr. Jones at 5 p.m. yesterday.",
                "They talked about J. Doe."
            ]
        );
    }

    #[test]
    fn test_sentence_split_closing_quotes_and_tail() {
        let tokenizer = EnglishTokenizer;
        let sentences = tokenizer.sentences("He said \"stop.\" Then he left... and the rest trails off");
        assert_eq!(
            sentences,
            vec!["He said \"stop.\"", "Then he left... and the rest trails off"]
        );
    }

    #[test]
    fn test_sentence_split_ignores_inner_periods() {
        let tokenizer = EnglishTokenizer;
        let sentences = tokenizer.sentences("Version 3.14 shipped on example.com today. Done.");
        assert_eq!(
            sentences,
            vec!["Version 3.14 shipped on example.com today.", "Done."]
        );
    }

    #[test]
    fn test_sentence_split_empty() {
        let tokenizer = EnglishTokenizer;
        assert!(tokenizer.sentences("").is_empty());
        assert!(tokenizer.sentences("   \t ").is_empty());
    }

    #[test]
    fn test_words_drop_numbers_and_punctuation() {
        let tokenizer = EnglishTokenizer;
        let words = tokenizer.words("It's 2024, and state-of-the-art tools -- finally -- work!");
        assert_eq!(
            words,
            vec!["It's", "and", "state-of-the-art", "tools", "finally", "work"]
        );
    }

    #[test]
    fn test_english_profile_is_shared() {
        let a = LanguageProfile::english();
        let b = LanguageProfile::for_language("English").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(LanguageProfile::for_language("elvish").is_none());
    }

    #[test]
    fn test_english_stop_words_and_stems() {
        let profile = LanguageProfile::english();
        assert!(profile.is_stop_word("the"));
        assert!(profile.is_stop_word("and"));
        assert!(!profile.is_stop_word("summarization"));
        assert_eq!(profile.stem("Running"), "run");
        assert_eq!(profile.stem("documents"), "document");
    }
}
