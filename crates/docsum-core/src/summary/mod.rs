mod document;
mod language;
mod lsa;
mod summarizer;

pub use document::{Document, Sentence};
pub use language::{EnglishTokenizer, LanguageProfile, SnowballStemmer, Tokenizer, WordStemmer};
pub use lsa::{LsaSummarizer, SummaryError};
pub use summarizer::{
    summarize, truncate, Summarizer, DEFAULT_FALLBACK_CHARS, DEFAULT_SENTENCE_COUNT,
};
