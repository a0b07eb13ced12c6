//! Local implementations for `rebrief`.
//!
//! - [`highlighting`]: the snippet matcher and highlight markup
//! - [`split_match`]: the simpler literal-string matcher
//! - [`pipeline`]: strategy selection and chunked highlighting
//! - [`summarizer`]: a `Summarizer` that shells out to a local program

pub mod coverage;
pub mod highlighting;
pub mod pipeline;
pub mod shellout;
pub mod split_match;
pub mod summarizer;
pub mod textprep;

pub use highlighting::{
    highlight_text, match_most_text, match_snippets, MatchOptions, MatchReport, Snippet,
};
pub use pipeline::{highlight_full, match_text, MatchStrategy};
pub use summarizer::CommandSummarizer;
