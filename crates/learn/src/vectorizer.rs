//! Bag-of-words count vectorizer

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Split a document into lowercase tokens of at least two word characters
pub fn tokenize(doc: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(doc)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Count vectorizer with a capped vocabulary
///
/// The vocabulary is fixed at fit time. Tokens unseen during fit are ignored
/// by [`BagOfWords::transform`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagOfWords {
    /// token -> column index, columns in alphabetical token order
    vocabulary: BTreeMap<String, usize>,
}

impl BagOfWords {
    /// Fit on `documents`, keeping the `max_features` most frequent tokens.
    ///
    /// Frequency is the total count over all documents; ties break
    /// alphabetically.
    pub fn fit<S: AsRef<str>>(documents: &[S], max_features: usize) -> Self {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for doc in documents {
            for token in tokenize(doc.as_ref()) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
        ranked.sort_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then_with(|| ta.cmp(tb)));
        ranked.truncate(max_features);

        let mut kept: Vec<String> = ranked.into_iter().map(|(t, _)| t).collect();
        kept.sort();
        let vocabulary: BTreeMap<String, usize> = kept
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t, i))
            .collect();

        debug!(
            documents = documents.len(),
            features = vocabulary.len(),
            max_features,
            "Vectorizer fitted"
        );
        Self { vocabulary }
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Tokens in column order
    pub fn feature_names(&self) -> Vec<&str> {
        // BTreeMap iterates alphabetically, which is the column order
        self.vocabulary.keys().map(String::as_str).collect()
    }

    /// Token counts of one document
    pub fn transform(&self, doc: &str) -> Vec<u32> {
        let mut row = vec![0u32; self.vocabulary.len()];
        for token in tokenize(doc) {
            if let Some(&idx) = self.vocabulary.get(&token) {
                row[idx] += 1;
            }
        }
        row
    }

    pub fn transform_batch<S: AsRef<str>>(&self, documents: &[S]) -> Vec<Vec<u32>> {
        documents
            .iter()
            .map(|doc| self.transform(doc.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pattern_compiles() {
        assert!(TOKEN_RE.is_match("ok"));
        assert!(!TOKEN_RE.is_match("a b c"));
    }

    #[test]
    fn test_tokenize_skips_single_chars() {
        assert_eq!(tokenize("a great x film"), vec!["great", "film"]);
    }

    #[test]
    fn test_vocabulary_capped_by_frequency() {
        let docs = ["good good good", "bad bad", "meh plot", "plot"];
        let bow = BagOfWords::fit(&docs, 3);
        // good:3, bad:2, plot:2, meh:1 -> keep good, bad, plot
        assert_eq!(bow.feature_names(), vec!["bad", "good", "plot"]);
    }

    #[test]
    fn test_frequency_ties_break_alphabetically() {
        let bow = BagOfWords::fit(&["zeta alpha beta"], 2);
        assert_eq!(bow.feature_names(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_transform_counts() {
        let bow = BagOfWords::fit(&["good plot", "bad plot"], 10);
        assert_eq!(bow.transform("plot plot good"), vec![0, 1, 2]);
    }

    #[test]
    fn test_unseen_tokens_do_not_change_vocabulary() {
        let bow = BagOfWords::fit(&["good plot"], 10);
        let before = bow.clone();
        let row = bow.transform("terrible unseen words");
        assert_eq!(row, vec![0, 0]);
        assert_eq!(bow, before);
    }

    #[test]
    fn test_small_vocabulary_not_padded() {
        let bow = BagOfWords::fit(&["one two"], 20);
        assert_eq!(bow.n_features(), 2);
    }
}
