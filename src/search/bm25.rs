//! Corpus statistics and BM25 scoring.
//!
//! Statistics are computed over one query's corpus snapshot and discarded
//! with it; nothing here persists between queries.

use std::collections::{HashMap, HashSet};

/// Term frequency saturation parameter.
const K1: f64 = 1.5;
/// Document length normalization parameter.
const B: f64 = 0.75;

/// Document-frequency and length statistics for one corpus snapshot.
#[derive(Debug)]
pub struct CorpusStats {
    /// Total number of documents, including ones with no tokens.
    pub doc_count: usize,
    /// token → number of documents containing it at least once.
    pub doc_frequency: HashMap<String, usize>,
    /// Mean token count per document; 1.0 for an empty corpus so the
    /// length normalization below never divides by zero.
    pub avg_doc_len: f64,
}

impl CorpusStats {
    /// Compute statistics over the token sequences of every document.
    ///
    /// Document frequency counts each token once per document regardless of
    /// how often it repeats within that document.
    pub fn from_documents<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut doc_count = 0usize;
        let mut total_len = 0usize;
        let mut doc_frequency: HashMap<String, usize> = HashMap::new();

        for tokens in documents {
            doc_count += 1;
            total_len += tokens.len();

            let distinct: HashSet<&String> = tokens.iter().collect();
            for token in distinct {
                *doc_frequency.entry(token.clone()).or_insert(0) += 1;
            }
        }

        let avg_doc_len = if doc_count == 0 {
            1.0
        } else {
            total_len as f64 / doc_count as f64
        };

        Self {
            doc_count,
            doc_frequency,
            avg_doc_len,
        }
    }

    /// BM25 score of one document against the query tokens.
    ///
    /// Query tokens absent from the corpus contribute nothing; a query token
    /// that repeats re-adds its contribution per occurrence. Documents with
    /// no tokens score 0.
    #[must_use]
    pub fn score(&self, query_tokens: &[String], doc_tokens: &[String]) -> f64 {
        if doc_tokens.is_empty() {
            return 0.0;
        }

        let mut tf: HashMap<&str, usize> = HashMap::new();
        for token in doc_tokens {
            *tf.entry(token.as_str()).or_insert(0) += 1;
        }

        let dl = doc_tokens.len() as f64;
        let n = self.doc_count as f64;
        let mut score = 0.0;

        for token in query_tokens {
            let Some(&df) = self.doc_frequency.get(token) else {
                continue;
            };
            if df == 0 {
                continue;
            }
            let df = df as f64;
            let term_freq = tf.get(token.as_str()).copied().unwrap_or(0) as f64;

            let idf = ((n - df + 0.5) / (df + 0.5) + 1.0).ln();
            score += idf * (term_freq * (K1 + 1.0))
                / (term_freq + K1 * (1.0 - B + B * dl / self.avg_doc_len));
        }

        score
    }
}
