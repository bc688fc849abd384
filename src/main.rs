// Resilient fetch CLI
//
// Retrieves each URL through the fallback chain and prints the batch report
// as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kodegen_tools_resilient_fetch::{FallbackEngine, FetchConfig, run_batch_report};

#[derive(Debug, Parser)]
#[command(name = "kodegen-resilient-fetch", version, about = "Fetch readable text with progressive fallbacks")]
struct Cli {
    /// URLs to retrieve
    #[arg(required = true)]
    urls: Vec<String>,

    /// Retrievals allowed in flight at once
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// HTTP attempts per retrieval
    #[arg(long)]
    max_retries: Option<u32>,

    /// Per-attempt HTTP timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Word threshold for structured extraction
    #[arg(long)]
    min_words: Option<usize>,

    /// Skip the headful browser level
    #[arg(long)]
    no_headful: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn config(&self) -> Result<FetchConfig> {
        let mut builder = FetchConfig::builder().enable_headful(!self.no_headful);
        if let Some(n) = self.max_concurrent {
            builder = builder.max_concurrent(n);
        }
        if let Some(n) = self.max_retries {
            builder = builder.max_retries(n);
        }
        if let Some(ms) = self.timeout_ms {
            builder = builder.timeout_ms(ms);
        }
        if let Some(n) = self.min_words {
            builder = builder.min_words(n);
        }
        builder.build().context("Invalid configuration")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let max_concurrent = config.max_concurrent();
    let engine = FallbackEngine::new(config);

    let report = run_batch_report(&engine, &cli.urls, max_concurrent).await;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;
    println!("{json}");

    Ok(())
}
