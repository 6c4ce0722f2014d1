//! Podcast digest — binary entrypoint.
//! Reads collected episodes from a JSON file, runs the processing pipeline and
//! prints the per-category digest.
//!
//! Usage: `podcast-digest [--json] [--log-format text|json] <episodes.json>`
//! (the input path may also come from `DIGEST_INPUT_PATH`).

use anyhow::Result;
use clap::Parser;
use podcast_digest::config::load_keywords_default;
use podcast_digest::metrics::Metrics;
use podcast_digest::{load_episodes_json, run, Categorizer, Digest, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const ENV_PRINT_METRICS: &str = "DIGEST_PRINT_METRICS";

#[derive(Debug, Parser)]
#[command(
    name = "podcast-digest",
    version,
    about = "Normalize, deduplicate and categorize collected podcast episodes."
)]
struct Args {
    /// JSON array of raw episodes written by the collectors.
    #[arg(env = "DIGEST_INPUT_PATH")]
    input: PathBuf,

    /// Print the digest as JSON instead of the text summary.
    #[arg(long)]
    json: bool,

    /// Log output format.
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("podcast_digest=info,warn"));

    match format {
        LogFormat::Text => fmt()
            .compact()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn real_main(args: Args) -> Result<ExitCode> {
    let settings = Settings::from_env();

    let metrics = if std::env::var(ENV_PRINT_METRICS).ok().as_deref() == Some("1") {
        Some(Metrics::init()?)
    } else {
        None
    };

    let table = load_keywords_default()?;
    let categorizer = Categorizer::new(&table)?;

    let raw = load_episodes_json(&args.input)?;
    if raw.is_empty() {
        warn!(path = %args.input.display(), "no episodes collected");
        return Ok(ExitCode::FAILURE);
    }

    let report = run(&raw, &categorizer, &settings.normalize_options());
    if report.total_episodes() == 0 {
        warn!("no episodes after processing");
        return Ok(ExitCode::FAILURE);
    }

    let digest = Digest::from_groups(
        chrono::Utc::now(),
        &report.groups,
        settings.max_episodes_per_category,
    );
    info!(total = digest.total_episodes, "digest assembled");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&digest)?);
    } else {
        println!("=== Digest Summary ===");
        println!("Date: {}", digest.date.format("%B %d, %Y"));
        println!("Total episodes: {}", digest.total_episodes);
        println!("\nEpisodes by category:");
        for (name, count) in digest.summary() {
            println!("  {name}: {count}");
        }
    }

    if let Some(m) = metrics {
        eprintln!("{}", m.render());
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    // Load .env first so DIGEST_INPUT_PATH can come from it.
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    init_tracing(args.log_format);

    match real_main(args) {
        Ok(code) => code,
        Err(e) => {
            error!(error = ?e, "digest run failed");
            ExitCode::FAILURE
        }
    }
}
