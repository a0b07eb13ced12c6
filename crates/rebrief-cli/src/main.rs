use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rebrief_core::{summarize_full, Summarizer};
use rebrief_local::coverage::{shingle_jaccard, snippet_coverage};
use rebrief_local::{
    highlight_full, highlight_text, match_text, textprep, CommandSummarizer, MatchOptions,
    MatchStrategy,
};

#[derive(Parser, Debug)]
#[command(name = "rebrief")]
#[command(
    about = "Find and highlight the parts of an article a summary was drawn from",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the article snippets a summary reuses, longest first.
    Match(MatchCmd),
    /// Extract snippets and print the article with them highlighted.
    Highlight(MatchCmd),
    /// Repair punctuation spacing in scraped article text.
    Cleanup(CleanupCmd),
    /// Summarize an article with a local program, then highlight what the summary reused.
    Summarize(SummarizeCmd),
    /// Print version info.
    Version(VersionCmd),
}

#[derive(clap::Args, Debug)]
struct ArticleArgs {
    /// Article text (inline).
    #[arg(long, conflicts_with = "article_file")]
    article: Option<String>,
    /// File containing the article (`-` reads stdin).
    #[arg(long)]
    article_file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct MatchArgs {
    /// Matching strategy. Allowed: document, split
    #[arg(long, env = "REBRIEF_STRATEGY", default_value = "document")]
    strategy: String,
    /// Reject texts longer than this many words (0 disables the bound).
    #[arg(long, env = "REBRIEF_MAX_WORDS", default_value_t = 5000)]
    max_words: usize,
}

impl MatchArgs {
    fn strategy(&self) -> Result<MatchStrategy> {
        Ok(self.strategy.parse::<MatchStrategy>()?)
    }

    fn options(&self) -> MatchOptions {
        if self.max_words == 0 {
            MatchOptions::default()
        } else {
            MatchOptions::bounded(self.max_words)
        }
    }
}

#[derive(clap::Args, Debug)]
struct MatchCmd {
    /// Summary text (inline).
    #[arg(long, conflicts_with = "summary_file")]
    summary: Option<String>,
    /// File containing the summary (`-` reads stdin).
    #[arg(long)]
    summary_file: Option<PathBuf>,
    #[command(flatten)]
    article: ArticleArgs,
    #[command(flatten)]
    matching: MatchArgs,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct CleanupCmd {
    #[command(flatten)]
    article: ArticleArgs,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "text")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct SummarizeCmd {
    /// Summarizer program. It reads the article on stdin and writes the summary to stdout.
    #[arg(long)]
    cmd: String,
    /// Argument for the summarizer program (repeatable).
    #[arg(long = "arg", allow_hyphen_values = true)]
    args: Vec<String>,
    /// Summarizer timeout (default: REBRIEF_SUMMARIZER_TIMEOUT_MS or 120000).
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Cap on summary bytes read from the program.
    #[arg(long)]
    max_summary_bytes: Option<usize>,
    /// Run `cleanup` on the article before summarizing.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    cleanup: bool,
    #[command(flatten)]
    article: ArticleArgs,
    #[command(flatten)]
    matching: MatchArgs,
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

#[derive(clap::Args, Debug)]
struct VersionCmd {
    /// Output format: json|text
    #[arg(long = "output", alias = "format", default_value = "json")]
    output: String,
}

fn read_stdin() -> Result<String> {
    let mut s = String::new();
    std::io::stdin()
        .read_to_string(&mut s)
        .context("read stdin")?;
    Ok(s)
}

fn read_input(inline: Option<String>, file: Option<&Path>, flag: &str) -> Result<String> {
    if let Some(s) = inline {
        return Ok(s);
    }
    match file {
        Some(p) if p == Path::new("-") => read_stdin(),
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("read {}", p.display())),
        None => anyhow::bail!("missing --{flag} or --{flag}-file"),
    }
}

fn read_article(args: ArticleArgs) -> Result<String> {
    read_input(args.article, args.article_file.as_deref(), "article")
}

fn read_summary_and_article(cmd: &mut MatchCmd) -> Result<(String, String)> {
    let stdin = Path::new("-");
    if cmd.summary_file.as_deref() == Some(stdin)
        && cmd.article.article_file.as_deref() == Some(stdin)
    {
        anyhow::bail!("only one of --summary-file and --article-file can read stdin");
    }
    let summary = read_input(cmd.summary.take(), cmd.summary_file.as_deref(), "summary")?;
    let article = read_input(
        cmd.article.article.take(),
        cmd.article.article_file.as_deref(),
        "article",
    )?;
    Ok((summary, article))
}

fn is_text(output: &str) -> bool {
    output.eq_ignore_ascii_case("text")
}

fn load_env_file() {
    // Opt-in only (REBRIEF_ENV_FILE); never overrides variables already set.
    let Ok(p) = std::env::var("REBRIEF_ENV_FILE") else {
        return;
    };
    let p = p.trim();
    if p.is_empty() {
        return;
    }
    let Ok(txt) = std::fs::read_to_string(p) else {
        return;
    };
    for raw in txt.lines() {
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let Some((k, v)) = s.split_once('=') else {
            continue;
        };
        let k = k.trim();
        if k.is_empty() {
            continue;
        }
        if std::env::var_os(k).is_none() {
            std::env::set_var(k, v.trim());
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("REBRIEF_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env_file();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Match(mut args) => {
            let (summary, article) = read_summary_and_article(&mut args)?;
            let strategy = args.matching.strategy()?;
            let snippets = match_text(strategy, &summary, &article, &args.matching.options())?;
            tracing::info!(strategy = %strategy, snippets = snippets.len(), "matched");
            if is_text(&args.output) {
                for s in &snippets {
                    println!("{s}");
                }
            } else {
                let v = serde_json::json!({
                    "schema_version": 1,
                    "kind": "match",
                    "ok": true,
                    "strategy": strategy,
                    "snippets": snippets,
                    "coverage": snippet_coverage(&summary, &snippets),
                    "jaccard_2": shingle_jaccard(&summary, &article, 2),
                });
                println!("{v}");
            }
        }
        Commands::Highlight(mut args) => {
            let (summary, article) = read_summary_and_article(&mut args)?;
            let strategy = args.matching.strategy()?;
            let snippets = match_text(strategy, &summary, &article, &args.matching.options())?;
            let highlighted = highlight_text(&snippets, &article);
            if is_text(&args.output) {
                println!("{highlighted}");
            } else {
                let v = serde_json::json!({
                    "schema_version": 1,
                    "kind": "highlight",
                    "ok": true,
                    "strategy": strategy,
                    "snippets": snippets,
                    "highlighted": highlighted,
                });
                println!("{v}");
            }
        }
        Commands::Cleanup(args) => {
            let output = args.output.clone();
            let article = read_article(args.article)?;
            let cleaned = textprep::cleanup(&article);
            if is_text(&output) {
                print!("{cleaned}");
            } else {
                let v = serde_json::json!({
                    "schema_version": 1,
                    "kind": "cleanup",
                    "ok": true,
                    "text": cleaned,
                });
                println!("{v}");
            }
        }
        Commands::Summarize(args) => {
            let strategy = args.matching.strategy()?;
            let opts = args.matching.options();
            let mut article = read_article(args.article)?;
            if args.cleanup {
                article = textprep::cleanup(&article);
            }

            let mut summarizer = CommandSummarizer::new(args.cmd, args.args);
            if let Some(ms) = args.timeout_ms {
                summarizer = summarizer.with_timeout(Duration::from_millis(ms));
            }
            if let Some(n) = args.max_summary_bytes {
                summarizer = summarizer.with_max_bytes(n);
            }

            let mut full = summarize_full(&summarizer, &article).await?;
            let summary = full.summary();
            let snippets = highlight_full(&mut full, strategy, &opts)?
                .into_iter()
                .flatten()
                .collect::<Vec<_>>();
            let highlighted = full.to_string();

            if is_text(&args.output) {
                println!("summary:\n{summary}\n\nhighlighted:\n{highlighted}");
            } else {
                let v = serde_json::json!({
                    "schema_version": 1,
                    "kind": "summarize",
                    "ok": true,
                    "model": summarizer.info(),
                    "strategy": strategy,
                    "summary": summary,
                    "snippets": snippets,
                    "coverage": snippet_coverage(&summary, &snippets),
                    "highlighted": highlighted,
                });
                println!("{v}");
            }
        }
        Commands::Version(args) => {
            let v = serde_json::json!({
                "schema_version": 1,
                "kind": "version",
                "ok": true,
                "name": "rebrief",
                "version": env!("CARGO_PKG_VERSION"),
            });
            match args.output.to_ascii_lowercase().as_str() {
                "text" => println!("rebrief {}", env!("CARGO_PKG_VERSION")),
                _ => println!("{}", v),
            }
        }
    }
    Ok(())
}
