use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Live-range bookkeeping went inconsistent. This is a logic defect, never an input problem.
    #[error("range invariant violated: {0}")]
    RangeInvariant(String),
    #[error("{side} text has {words} words (max {max})")]
    TooLarge {
        side: &'static str,
        words: usize,
        max: usize,
    },
    #[error("summarizer failed: {0}")]
    Summarizer(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("io error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// One piece of a source text together with the summary generated for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub text: String,
    pub summary: String,
    /// Whitespace that follows `text` in the full document.
    #[serde(default)]
    pub ws: String,
}

/// A source text split into summarized chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFull {
    pub texts: Vec<TextChunk>,
}

impl TextFull {
    /// Single-chunk value: the whole text and its summary.
    pub fn wrap(text: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            texts: vec![TextChunk {
                text: text.into(),
                summary: summary.into(),
                ws: String::new(),
            }],
        }
    }

    /// All chunk summaries joined with a single space.
    pub fn summary(&self) -> String {
        self.texts
            .iter()
            .map(|t| t.summary.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for TextFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in &self.texts {
            f.write_str(&chunk.text)?;
            f.write_str(&chunk.ws)?;
        }
        Ok(())
    }
}

/// Descriptive metadata for a summarization model (shown by front-ends next to its output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Short, stable identifier.
    pub name: String,
    pub display_name: String,
    pub description: String,
}

/// A black-box summarization model: text in, summary out.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    fn info(&self) -> &ModelInfo;
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// Summarize `text` and wrap the result as a one-chunk `TextFull`.
pub async fn summarize_full(summarizer: &dyn Summarizer, text: &str) -> Result<TextFull> {
    let summary = summarizer.summarize(text).await?;
    Ok(TextFull::wrap(text, summary))
}
