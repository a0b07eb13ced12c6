//! Longest-common-snippet matching between a summary and the text it was generated from.
//!
//! Both texts are tokenized into [`Document`]s of [`Word`]s. A [`HighlightedDocument`] pairs a
//! document with its *live* ranges: the parts no extracted snippet has claimed yet. The
//! extraction loop repeatedly takes the longest word run (at least [`MIN_SIZE`] words) shared by
//! a live summary range and a live original range, records the original's text for it, and
//! removes it from both sides.
//!
//! Word equality ignores case and ASCII punctuation (see [`crate::textprep::match_key`]), so
//! `"Dog."` matches `"dog"`. Returned snippet text is always taken verbatim from the original.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use rebrief_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::textprep::match_key;

/// Shortest shared span (in words) that counts as a snippet.
pub const MIN_SIZE: usize = 2;

const HIGHLIGHT_OPEN: &str = "<span style=\"background-color: #FFFF00\"> **";
const HIGHLIGHT_CLOSE: &str = "** </span>";

// Past this size the span_in memo table is dropped and rebuilt.
const FOUND_CACHE_MAX: usize = 100_000;

#[derive(Debug, Clone)]
pub struct Word {
    /// How the word appears in the text.
    display: String,
    /// Whitespace following the word.
    tail_ws: String,
    match_key: String,
}

impl Word {
    pub fn new(display: impl Into<String>, tail_ws: impl Into<String>) -> Self {
        let display = display.into();
        let match_key = match_key(&display);
        Self {
            display,
            tail_ws: tail_ws.into(),
            match_key,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn tail_ws(&self) -> &str {
        &self.tail_ws
    }

    pub fn match_key(&self) -> &str {
        &self.match_key
    }

    /// A word with nothing to match on (punctuation only).
    pub fn is_empty(&self) -> bool {
        self.match_key.is_empty()
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.match_key == other.match_key
    }
}

impl Eq for Word {}

/// Words joined by their trailing whitespace, without the last word's.
fn concat_words(words: &[Word]) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        out.push_str(&word.display);
        if i + 1 < words.len() {
            out.push_str(&word.tail_ws);
        }
    }
    out
}

/// Half-open interval `[start, end)` of word indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn size(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// `self ⊇ other`, for a non-empty `other`.
    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.start < other.end && other.end <= self.end
    }

    /// Every subrange of at least [`MIN_SIZE`] words: largest first, then by increasing start.
    ///
    /// The matcher relies on this order: the first subrange found elsewhere is the longest one.
    pub fn all_subranges(&self) -> Subranges {
        Subranges {
            start: self.start,
            end: self.end,
            size: self.size(),
            next_start: self.start,
        }
    }
}

impl IntoIterator for Range {
    type Item = usize;
    type IntoIter = std::ops::Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices()
    }
}

/// Lazy iterator returned by [`Range::all_subranges`].
#[derive(Debug, Clone)]
pub struct Subranges {
    start: usize,
    end: usize,
    size: usize,
    next_start: usize,
}

impl Iterator for Subranges {
    type Item = Range;

    fn next(&mut self) -> Option<Range> {
        while self.size >= MIN_SIZE {
            if self.next_start + self.size <= self.end {
                let r = Range::new(self.next_start, self.next_start + self.size);
                self.next_start += 1;
                return Some(r);
            }
            self.size -= 1;
            self.next_start = self.start;
        }
        None
    }
}

/// Immutable tokenized text.
#[derive(Debug, Clone, Default)]
pub struct Document {
    words: Vec<Word>,
    fingerprint: u64,
}

impl Document {
    pub fn new(words: Vec<Word>) -> Self {
        let fingerprint = fingerprint(&words);
        Self { words, fingerprint }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Word> {
        self.words.get(i)
    }

    /// Memoization key. See [`fingerprint`].
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Display text of `range`, as it appeared in the source.
    pub fn text(&self, range: Range) -> String {
        concat_words(&self[range])
    }
}

impl Index<usize> for Document {
    type Output = Word;

    fn index(&self, i: usize) -> &Word {
        &self.words[i]
    }
}

impl Index<Range> for Document {
    type Output = [Word];

    fn index(&self, r: Range) -> &[Word] {
        &self.words[r.indices()]
    }
}

/// XOR of the words' display-string hashes.
///
/// Order-insensitive and collision-prone: "a b" and "b a" share a fingerprint. Only fit as a
/// cache key, never as a stand-in for content equality.
pub fn fingerprint(words: &[Word]) -> u64 {
    words.iter().fold(0, |acc, w| {
        let mut h = DefaultHasher::new();
        w.display.hash(&mut h);
        acc ^ h.finish()
    })
}

/// A document plus the ranges of it not yet claimed by a snippet.
///
/// Live ranges are pairwise disjoint and only ever shrink.
#[derive(Debug, Clone)]
pub struct HighlightedDocument {
    pub document: Document,
    pub ranges: Vec<Range>,
}

fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

impl HighlightedDocument {
    /// Tokenize `text` on whitespace runs.
    ///
    /// Each word keeps the whitespace that follows it, so concatenating the words gives back the
    /// trimmed input, minus punctuation-only words (those are dropped together with their
    /// trailing whitespace).
    pub fn from_text(text: &str) -> Self {
        let mut words = Vec::new();
        let mut display = String::new();
        let mut tail_ws = String::new();
        let mut in_ws = false;

        for c in text.trim().chars() {
            let ws = is_ws(c);
            if !ws && in_ws {
                push_word(
                    &mut words,
                    std::mem::take(&mut display),
                    std::mem::take(&mut tail_ws),
                );
            }
            if ws {
                tail_ws.push(c);
            } else {
                display.push(c);
            }
            in_ws = ws;
        }
        push_word(&mut words, display, tail_ws);

        let len = words.len();
        Self {
            document: Document::new(words),
            ranges: vec![Range::new(0, len)],
        }
    }

    /// Words still unclaimed.
    pub fn live_words(&self) -> usize {
        self.ranges.iter().map(Range::size).sum()
    }
}

fn push_word(words: &mut Vec<Word>, display: String, tail_ws: String) {
    let word = Word::new(display, tail_ws);
    if !word.is_empty() {
        words.push(word);
    }
}

impl fmt::Display for HighlightedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "Range {i}")?;
            writeln!(f, "{}", self.document.text(*range))?;
        }
        Ok(())
    }
}

/// Number of words `text` tokenizes to (punctuation-only tokens excluded).
pub fn word_count(text: &str) -> usize {
    HighlightedDocument::from_text(text).document.len()
}

/// Word-by-word equality of two equally sized spans.
pub fn span_equal(
    document_x: &Document,
    range_x: Range,
    document_y: &Document,
    range_y: Range,
) -> bool {
    range_x.size() == range_y.size() && document_x[range_x] == document_y[range_y]
}

/// First window of `range_y` (smallest start) holding the same words as `range_x`.
///
/// `None` when `range_y` is empty or shorter than `range_x`.
pub fn span_in(
    document_x: &Document,
    range_x: Range,
    document_y: &Document,
    range_y: Range,
) -> Option<Range> {
    let size = range_x.size();
    if range_y.is_empty() || size > range_y.size() {
        return None;
    }
    (range_y.start..=range_y.end - size)
        .map(|st| Range::new(st, st + size))
        .find(|window| span_equal(document_x, range_x, document_y, *window))
}

/// Memoized [`span_in`] lookups for one summary/original pair.
///
/// The documents are fixed when the cache is built, so an answer can never leak between
/// different pairs. Lives for one extraction call.
#[derive(Debug)]
pub struct SpanCache<'a> {
    summary: &'a Document,
    original: &'a Document,
    found: HashMap<(Range, Range), Option<Range>>,
}

impl<'a> SpanCache<'a> {
    pub fn new(summary: &'a Document, original: &'a Document) -> Self {
        Self {
            summary,
            original,
            found: HashMap::new(),
        }
    }

    /// [`span_in`] of a summary range within an original range.
    pub fn span_in(&mut self, range_x: Range, range_y: Range) -> Option<Range> {
        if let Some(&hit) = self.found.get(&(range_x, range_y)) {
            return hit;
        }
        let found = span_in(self.summary, range_x, self.original, range_y);
        if self.found.len() >= FOUND_CACHE_MAX {
            self.found.clear();
        }
        self.found.insert((range_x, range_y), found);
        found
    }

    /// Longest subrange of `range_x` that also occurs inside `range_y`, with where it occurs.
    pub fn longest_subspan(&mut self, range_x: Range, range_y: Range) -> Option<SpanMatch> {
        range_x.all_subranges().find_map(|sub_x| {
            self.span_in(sub_x, range_y).map(|sub_y| SpanMatch {
                summary: sub_x,
                original: sub_y,
            })
        })
    }

    /// Longest span shared by any live summary range and any live original range.
    ///
    /// Ties go to the pair visited first (summary ranges outer, original ranges inner).
    pub fn longest_text(
        &mut self,
        summary_ranges: &[Range],
        original_ranges: &[Range],
    ) -> Option<SpanMatch> {
        let mut found = Vec::new();
        for &sum_range in summary_ranges {
            for &orig_range in original_ranges {
                if let Some(m) = self.longest_subspan(sum_range, orig_range) {
                    found.push(m);
                }
            }
        }
        found
            .into_iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.size().cmp(&b.size()).then(ib.cmp(ia)))
            .map(|(_, m)| m)
    }

    pub fn len(&self) -> usize {
        self.found.len()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }
}

/// Equal-content spans: `summary` in the summary document, `original` in the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanMatch {
    pub summary: Range,
    pub original: Range,
}

impl SpanMatch {
    pub fn size(&self) -> usize {
        self.summary.size()
    }
}

/// Replace the live range containing `subtrahend` by what is left of it on either side.
fn subtract_ranges(minuend: &[Range], subtrahend: Range) -> Result<Vec<Range>> {
    let mut subtracted = false;
    let mut out = Vec::with_capacity(minuend.len() + 1);
    for &range in minuend {
        if range.contains(&subtrahend) {
            subtracted = true;
            let left = Range::new(range.start, subtrahend.start);
            if !left.is_empty() {
                out.push(left);
            }
            let right = Range::new(subtrahend.end, range.end);
            if !right.is_empty() {
                out.push(right);
            }
        } else {
            out.push(range);
        }
    }

    if !subtracted {
        tracing::error!(?subtrahend, ?minuend, "claimed span is outside every live range");
        return Err(Error::RangeInvariant(format!(
            "{subtrahend:?} is not inside any of {minuend:?}"
        )));
    }
    Ok(out)
}

/// Limits applied before matching starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Reject either text when it tokenizes to more words than this.
    pub max_words: Option<usize>,
}

impl MatchOptions {
    pub fn bounded(max_words: usize) -> Self {
        Self {
            max_words: Some(max_words),
        }
    }

    pub fn check(&self, side: &'static str, words: usize) -> Result<()> {
        match self.max_words {
            Some(max) if words > max => Err(Error::TooLarge { side, words, max }),
            _ => Ok(()),
        }
    }
}

/// One extracted snippet: its text (from the original) and where it sits on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    pub summary_range: Range,
    pub original_range: Range,
}

impl Snippet {
    pub fn words(&self) -> usize {
        self.original_range.size()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    /// In discovery order: longest first.
    pub snippets: Vec<Snippet>,
    pub summary_words: usize,
    pub original_words: usize,
}

impl MatchReport {
    pub fn texts(&self) -> Vec<String> {
        self.snippets.iter().map(|s| s.text.clone()).collect()
    }
}

/// Extract the spans of `original_text` that `text` reuses, longest first.
pub fn match_snippets(text: &str, original_text: &str, opts: &MatchOptions) -> Result<MatchReport> {
    let mut summary = HighlightedDocument::from_text(text);
    let mut original = HighlightedDocument::from_text(original_text);
    opts.check("summary", summary.document.len())?;
    opts.check("original", original.document.len())?;

    let mut cache = SpanCache::new(&summary.document, &original.document);
    let mut snippets = Vec::new();
    while let Some(m) = cache.longest_text(&summary.ranges, &original.ranges) {
        let snippet_text = original.document.text(m.original);
        tracing::debug!(
            words = m.size(),
            summary_range = ?m.summary,
            original_range = ?m.original,
            "extracted snippet"
        );
        summary.ranges = subtract_ranges(&summary.ranges, m.summary)?;
        original.ranges = subtract_ranges(&original.ranges, m.original)?;
        snippets.push(Snippet {
            text: snippet_text,
            summary_range: m.summary,
            original_range: m.original,
        });
    }
    tracing::debug!(
        snippets = snippets.len(),
        summary_unclaimed = summary.live_words(),
        cache_entries = cache.len(),
        "matching done"
    );

    Ok(MatchReport {
        snippets,
        summary_words: summary.document.len(),
        original_words: original.document.len(),
    })
}

/// Finds the longest consecutive segments of `text` that also occur in `original_text`.
///
/// Snippet text comes from `original_text`, in "largest match first" order.
pub fn match_most_text(text: &str, original_text: &str) -> Result<Vec<String>> {
    Ok(match_snippets(text, original_text, &MatchOptions::default())?.texts())
}

/// Wrap the first remaining occurrence of each snippet in `article` with highlight markup.
///
/// Snippets are applied in order against the already-marked-up article. A snippet with no
/// literal occurrence is skipped.
pub fn highlight_text<S: AsRef<str>>(snippets: &[S], article: &str) -> String {
    let mut article = article.to_string();
    for snippet in snippets {
        let snippet = snippet.as_ref();
        if snippet.is_empty() {
            continue;
        }
        match article.find(snippet) {
            Some(idx) => {
                article.insert_str(idx + snippet.len(), HIGHLIGHT_CLOSE);
                article.insert_str(idx, HIGHLIGHT_OPEN);
            }
            None => tracing::debug!(snippet, "snippet not found verbatim; skipping"),
        }
    }
    article
}
