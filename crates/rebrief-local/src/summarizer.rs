//! `Summarizer` backed by an external program.
//!
//! The program receives the article on stdin and writes the summary to stdout. Any model that
//! can be wrapped in a script (a transformers pipeline, a TextRank script) plugs in this way.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use rebrief_core::{Error, ModelInfo, Result, Summarizer};

use crate::shellout;

const DEFAULT_TIMEOUT_MS: u64 = 120_000;
const DEFAULT_MAX_BYTES: usize = 1_000_000;

#[derive(Debug, Clone)]
pub struct CommandSummarizer {
    info: ModelInfo,
    program: String,
    args: Vec<String>,
    timeout: Duration,
    max_bytes: usize,
}

impl CommandSummarizer {
    /// Timeout and output cap come from `REBRIEF_SUMMARIZER_TIMEOUT_MS` and
    /// `REBRIEF_SUMMARIZER_MAX_BYTES` when set.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        let name = Path::new(&program)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.clone());
        let info = ModelInfo {
            display_name: format!("Command ({name})"),
            description: format!("Summary produced by running `{program}` over the article."),
            name,
        };
        Self {
            info,
            program,
            args,
            timeout: shellout::timeout_from_env_ms(
                "REBRIEF_SUMMARIZER_TIMEOUT_MS",
                DEFAULT_TIMEOUT_MS,
            ),
            max_bytes: shellout::max_bytes_from_env(
                "REBRIEF_SUMMARIZER_MAX_BYTES",
                DEFAULT_MAX_BYTES,
            ),
        }
    }

    pub fn with_info(mut self, info: ModelInfo) -> Self {
        self.info = info;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

#[async_trait::async_trait]
impl Summarizer for CommandSummarizer {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    async fn summarize(&self, text: &str) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        let input = text.as_bytes().to_vec();
        let (timeout, max_bytes) = (self.timeout, self.max_bytes);

        let out = tokio::task::spawn_blocking(move || {
            shellout::run_with_stdin_bounded(cmd, &input, timeout, max_bytes)
        })
        .await
        .map_err(|e| Error::Summarizer(format!("{}: {e}", self.info.name)))?
        .map_err(|code| Error::Summarizer(format!("{}: {code}", self.info.name)))?;

        let summary = String::from_utf8_lossy(&out).trim().to_string();
        tracing::debug!(
            model = %self.info.name,
            input_chars = text.len(),
            summary_chars = summary.len(),
            "summarized"
        );
        Ok(summary)
    }
}
