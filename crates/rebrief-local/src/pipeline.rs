use std::fmt;
use std::str::FromStr;

use rebrief_core::{Error, Result, TextFull};
use serde::{Deserialize, Serialize};

use crate::highlighting::{self, highlight_text, word_count, MatchOptions};
use crate::split_match;

/// Which snippet matcher to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Tokenized documents with case/punctuation-insensitive words.
    #[default]
    Document,
    /// Literal whole-string matching on whitespace-split words.
    Split,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Split => "split",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" | "doc" => Ok(Self::Document),
            "split" => Ok(Self::Split),
            other => Err(Error::InvalidArgument(format!(
                "unknown match strategy {other:?} (allowed: document, split)"
            ))),
        }
    }
}

/// Snippets of `article` reused by `summary`, longest first.
pub fn match_text(
    strategy: MatchStrategy,
    summary: &str,
    article: &str,
    opts: &MatchOptions,
) -> Result<Vec<String>> {
    match strategy {
        MatchStrategy::Document => {
            Ok(highlighting::match_snippets(summary, article, opts)?.texts())
        }
        MatchStrategy::Split => {
            opts.check("summary", word_count(summary))?;
            opts.check("original", word_count(article))?;
            Ok(split_match::match_most_text(summary, article))
        }
    }
}

/// Highlight every chunk's text with the snippets its summary reuses.
///
/// Stops at the first chunk without a summary; later chunks are left as they are. Returns the
/// snippets used for each highlighted chunk.
pub fn highlight_full(
    full: &mut TextFull,
    strategy: MatchStrategy,
    opts: &MatchOptions,
) -> Result<Vec<Vec<String>>> {
    let mut per_chunk = Vec::new();
    for chunk in &mut full.texts {
        if chunk.summary.is_empty() {
            break;
        }
        let snippets = match_text(strategy, &chunk.summary, &chunk.text, opts)?;
        chunk.text = highlight_text(&snippets, &chunk.text);
        per_chunk.push(snippets);
    }
    Ok(per_chunk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebrief_core::TextChunk;

    #[test]
    fn strategy_parses_and_round_trips() {
        assert_eq!("document".parse::<MatchStrategy>().unwrap(), MatchStrategy::Document);
        assert_eq!(" Split ".parse::<MatchStrategy>().unwrap(), MatchStrategy::Split);
        assert_eq!("doc".parse::<MatchStrategy>().unwrap(), MatchStrategy::Document);
        assert!(matches!(
            "fuzzy".parse::<MatchStrategy>(),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(MatchStrategy::Split.to_string(), "split");
        assert_eq!(
            serde_json::to_string(&MatchStrategy::Document).unwrap(),
            "\"document\""
        );
    }

    #[test]
    fn strategies_differ_on_case() {
        let opts = MatchOptions::default();
        let doc = match_text(MatchStrategy::Document, "Quick Brown", "the quick brown fox", &opts)
            .unwrap();
        assert_eq!(doc, vec!["quick brown"]);
        let split = match_text(MatchStrategy::Split, "Quick Brown", "the quick brown fox", &opts)
            .unwrap();
        assert!(split.is_empty());
    }

    #[test]
    fn split_strategy_respects_the_bound() {
        let err = match_text(
            MatchStrategy::Split,
            "a b c",
            "a b c",
            &MatchOptions::bounded(2),
        )
        .unwrap_err();
        assert!(matches!(err, Error::TooLarge { side: "summary", .. }));
    }

    #[test]
    fn highlight_full_stops_at_first_chunk_without_summary() {
        let mut full = TextFull {
            texts: vec![
                TextChunk {
                    text: "the quick brown fox".to_string(),
                    summary: "quick brown".to_string(),
                    ws: "\n".to_string(),
                },
                TextChunk {
                    text: "over the lazy dog".to_string(),
                    summary: String::new(),
                    ws: "\n".to_string(),
                },
                TextChunk {
                    text: "lazy dog again".to_string(),
                    summary: "lazy dog".to_string(),
                    ws: String::new(),
                },
            ],
        };
        let per_chunk =
            highlight_full(&mut full, MatchStrategy::Document, &MatchOptions::default()).unwrap();
        assert_eq!(per_chunk, vec![vec!["quick brown".to_string()]]);
        assert_eq!(
            full.to_string(),
            "the <span style=\"background-color: #FFFF00\"> **quick brown** </span> fox\nover the lazy dog\nlazy dog again"
        );
    }
}
