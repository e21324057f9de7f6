//! Latent semantic analysis sentence ranking
//!
//! 1. Build a dictionary of stems for every non-stop-word in the document
//! 2. Fill a term-by-sentence count matrix and normalize each column
//! 3. Decompose it with a thin SVD
//! 4. Rank each sentence by its length in the sigma-weighted topic space

use std::collections::HashMap;

use nalgebra::DMatrix;
use thiserror::Error;

use super::document::{Document, Sentence};
use super::language::LanguageProfile;

/// Column smoothing applied to term frequencies
const TF_SMOOTHING: f64 = 0.4;

/// Lower bound for the SVD iteration budget
const MIN_SVD_ITERATIONS: usize = 10_000;

/// Largest dense term matrix (terms x sentences) worth decomposing
pub const MAX_MATRIX_CELLS: usize = 10_000_000;

/// Significant digits kept when comparing ranks; the SVD leaves noise in the last bits
const RANK_SIGNIFICANT_DIGITS: i32 = 12;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SummaryError {
    #[error("document has no sentences")]
    NoSentences,

    #[error("document has no rankable terms")]
    EmptyDictionary,

    #[error("singular value decomposition did not converge ({rows}x{cols} matrix)")]
    DecompositionFailed { rows: usize, cols: usize },

    #[error("sentence ranking produced a non-finite score")]
    NonFiniteScore,

    #[error("term matrix too large to decompose ({rows}x{cols}, limit {limit} cells)")]
    MatrixTooLarge {
        rows: usize,
        cols: usize,
        limit: usize,
    },
}

/// Ranks sentences with latent semantic analysis
pub struct LsaSummarizer<'a> {
    profile: &'a LanguageProfile,
    max_cells: usize,
}

impl<'a> LsaSummarizer<'a> {
    pub fn new(profile: &'a LanguageProfile) -> Self {
        Self {
            profile,
            max_cells: MAX_MATRIX_CELLS,
        }
    }

    /// Override the term matrix size limit
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    /// Select up to `count` sentences, returned in document order
    pub fn summarize<'d>(
        &self,
        document: &'d Document,
        count: usize,
    ) -> Result<Vec<&'d Sentence>, SummaryError> {
        let sentences = document.sentences();
        let ranks: Vec<f64> = self
            .rank(document)?
            .into_iter()
            .map(round_significant)
            .collect();

        let mut order: Vec<usize> = (0..sentences.len()).collect();
        // Equal ranks keep document order
        order.sort_by(|&a, &b| ranks[b].total_cmp(&ranks[a]).then(a.cmp(&b)));
        order.truncate(count);
        order.sort_unstable();

        Ok(order.into_iter().map(|i| sentences[i]).collect())
    }

    /// Salience score per candidate sentence, in document order
    pub fn rank(&self, document: &Document) -> Result<Vec<f64>, SummaryError> {
        let sentences = document.sentences();
        if sentences.is_empty() {
            return Err(SummaryError::NoSentences);
        }

        let dictionary = self.dictionary(document);
        if dictionary.is_empty() {
            return Err(SummaryError::EmptyDictionary);
        }
        if dictionary.len() < sentences.len() {
            tracing::debug!(
                terms = dictionary.len(),
                sentences = sentences.len(),
                "Fewer terms than sentences, ranking may be poor"
            );
        }

        let (rows, cols) = (dictionary.len(), sentences.len());
        if rows.saturating_mul(cols) > self.max_cells {
            return Err(SummaryError::MatrixTooLarge {
                rows,
                cols,
                limit: self.max_cells,
            });
        }

        let mut matrix = self.term_matrix(&sentences, &dictionary);
        normalize_term_frequency(&mut matrix);

        let max_iterations = MIN_SVD_ITERATIONS.max(30 * rows.min(cols));
        let svd = matrix
            .try_svd(false, true, f64::EPSILON, max_iterations)
            .ok_or(SummaryError::DecompositionFailed { rows, cols })?;
        let v_t = svd
            .v_t
            .ok_or(SummaryError::DecompositionFailed { rows, cols })?;

        let powered_sigma: Vec<f64> = svd.singular_values.iter().map(|s| s * s).collect();

        let ranks: Vec<f64> = (0..cols)
            .map(|col| {
                powered_sigma
                    .iter()
                    .enumerate()
                    .map(|(topic, sigma)| sigma * v_t[(topic, col)].powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();

        if ranks.iter().any(|r| !r.is_finite()) {
            return Err(SummaryError::NonFiniteScore);
        }

        Ok(ranks)
    }

    /// Map each stem of a non-stop-word to a matrix row, in first-seen order
    fn dictionary(&self, document: &Document) -> HashMap<String, usize> {
        let mut dictionary = HashMap::new();
        for word in document.words() {
            let normalized = self.profile.normalize(word);
            if self.profile.is_stop_word(&normalized) {
                continue;
            }
            let stem = self.profile.stem(&normalized);
            let next = dictionary.len();
            dictionary.entry(stem).or_insert(next);
        }
        dictionary
    }

    fn term_matrix(
        &self,
        sentences: &[&Sentence],
        dictionary: &HashMap<String, usize>,
    ) -> DMatrix<f64> {
        let mut matrix = DMatrix::<f64>::zeros(dictionary.len(), sentences.len());
        for (col, sentence) in sentences.iter().enumerate() {
            for word in &sentence.words {
                if let Some(&row) = dictionary.get(&self.profile.stem(word)) {
                    matrix[(row, col)] += 1.0;
                }
            }
        }
        matrix
    }
}

/// Round to a fixed number of significant digits
fn round_significant(value: f64) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let scale = 10f64.powi(RANK_SIGNIFICANT_DIGITS - 1 - magnitude);
    (value * scale).round() / scale
}

/// Scale each column by its maximum count with smoothing:
/// `smoothing + (1 - smoothing) * tf / max_tf`
fn normalize_term_frequency(matrix: &mut DMatrix<f64>) {
    for mut column in matrix.column_iter_mut() {
        let max = column.max();
        if max == 0.0 {
            continue;
        }
        for value in column.iter_mut() {
            *value = TF_SMOOTHING + (1.0 - TF_SMOOTHING) * (*value / max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (Document, std::sync::Arc<LanguageProfile>) {
        let profile = LanguageProfile::english();
        let doc = Document::parse(text, profile.tokenizer());
        (doc, profile)
    }

    #[test]
    fn test_normalize_term_frequency() {
        let mut matrix = DMatrix::from_row_slice(2, 3, &[2.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        normalize_term_frequency(&mut matrix);

        assert!((matrix[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((matrix[(1, 0)] - 0.7).abs() < 1e-12);
        // All-zero column is left untouched
        assert_eq!(matrix[(0, 1)], 0.0);
        assert_eq!(matrix[(1, 1)], 0.0);
        assert!((matrix[(0, 2)] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank_errors() {
        let (doc, profile) = parse("");
        assert_eq!(
            LsaSummarizer::new(&profile).rank(&doc),
            Err(SummaryError::NoSentences)
        );

        let (doc, profile) = parse("%%% ### 1234 ... !!!");
        assert_eq!(
            LsaSummarizer::new(&profile).rank(&doc),
            Err(SummaryError::EmptyDictionary)
        );
    }

    #[test]
    fn test_central_sentence_ranks_highest() {
        let (doc, profile) = parse(
            "Rust compilers check memory safety. \
             Rust compilers check memory safety and thread safety at compile time. \
             Gardeners water tomatoes.",
        );
        let ranks = LsaSummarizer::new(&profile).rank(&doc).unwrap();

        assert_eq!(ranks.len(), 3);
        assert!(ranks.iter().all(|r| r.is_finite() && *r >= 0.0));
        assert!(ranks[1] > ranks[2]);
    }

    #[test]
    fn test_summarize_preserves_document_order() {
        let (doc, profile) = parse(
            "Solar panels convert sunlight into electricity. \
             Cats sleep most of the day. \
             Solar electricity reduces household energy bills. \
             Modern solar panels convert sunlight efficiently into cheap electricity.",
        );
        let picked = LsaSummarizer::new(&profile).summarize(&doc, 2).unwrap();
        assert_eq!(picked.len(), 2);

        let all = doc.sentences();
        let positions: Vec<usize> = picked
            .iter()
            .map(|p| all.iter().position(|s| s.text == p.text).unwrap())
            .collect();
        assert!(positions[0] < positions[1]);
    }

    #[test]
    fn test_round_significant() {
        assert_eq!(
            round_significant(1.8654758106177634),
            round_significant(1.8654758106177651)
        );
        assert_eq!(round_significant(0.0), 0.0);
        assert!(round_significant(1.5) > round_significant(1.4));
    }

    #[test]
    fn test_equal_sentences_keep_document_order() {
        let (doc, profile) = parse(
            "Report Alpha arrived. Report Bravo arrived. \
             Report Charlie arrived. Report Delta arrived.",
        );
        let picked = LsaSummarizer::new(&profile).summarize(&doc, 2).unwrap();
        let texts: Vec<&str> = picked.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Report Alpha arrived.", "Report Bravo arrived."]);
    }

    #[test]
    fn test_equal_sentences_pick_leading_prefix() {
        let names = [
            "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Hotel", "India",
            "Juliet", "Kilo", "Lima", "Oscar",
        ];
        for total in 3..=names.len() {
            let text = names[..total]
                .iter()
                .map(|name| format!("Report {} arrived.", name))
                .collect::<Vec<_>>()
                .join(" ");
            let (doc, profile) = parse(&text);

            for count in 1..total {
                let picked = LsaSummarizer::new(&profile).summarize(&doc, count).unwrap();
                let expected: Vec<String> = names[..count]
                    .iter()
                    .map(|name| format!("Report {} arrived.", name))
                    .collect();
                let texts: Vec<&str> = picked.iter().map(|s| s.text.as_str()).collect();
                assert_eq!(texts, expected, "{} sentences, picking {}", total, count);
            }
        }
    }

    #[test]
    fn test_oversized_matrix_is_refused() {
        let (doc, profile) = parse(
            "Solar panels convert sunlight. Wind turbines spin. Rivers carry sediment.",
        );
        let result = LsaSummarizer::new(&profile).with_max_cells(4).rank(&doc);
        assert!(matches!(
            result,
            Err(SummaryError::MatrixTooLarge { cols: 3, limit: 4, .. })
        ));
    }

    #[test]
    fn test_summarize_returns_everything_when_short() {
        let (doc, profile) = parse("Alpha particles decay. Beta particles scatter.");
        let picked = LsaSummarizer::new(&profile).summarize(&doc, 10).unwrap();
        let texts: Vec<&str> = picked.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Alpha particles decay.", "Beta particles scatter."]);
    }
}
