//! How much of a summary its snippets account for.
//!
//! Both metrics tokenize with [`HighlightedDocument::from_text`], so they see the same words
//! (and the same case/punctuation-insensitive keys) as the matcher.

use std::collections::HashSet;

use crate::highlighting::{word_count, Document, HighlightedDocument, Word};

/// Fraction of the summary's words that the snippets account for, in `[0, 1]`.
///
/// An empty summary has zero coverage.
pub fn snippet_coverage<S: AsRef<str>>(summary: &str, snippets: &[S]) -> f64 {
    let total = word_count(summary);
    if total == 0 {
        return 0.0;
    }
    let covered: usize = snippets.iter().map(|s| word_count(s.as_ref())).sum();
    (covered as f64 / total as f64).min(1.0)
}

/// Runs of `k` consecutive match keys.
fn shingles(document: &Document, k: usize) -> HashSet<Vec<&str>> {
    if k == 0 {
        return HashSet::new();
    }
    document
        .words()
        .windows(k)
        .map(|run| run.iter().map(Word::match_key).collect())
        .collect()
}

/// Jaccard overlap of the `k`-word shingles of `summary` and `article`.
///
/// Two texts with no shingles at all count as identical (1.0).
pub fn shingle_jaccard(summary: &str, article: &str, k: usize) -> f64 {
    let summary = HighlightedDocument::from_text(summary).document;
    let article = HighlightedDocument::from_text(article).document;
    let a = shingles(&summary, k);
    let b = shingles(&article, k);
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let shared = a.intersection(&b).count();
    shared as f64 / (a.len() + b.len() - shared) as f64
}
