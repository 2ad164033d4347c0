//! TickerPulse - daily ticker sentiment from social-media posts
//!
//! # Usage
//! ```sh
//! tickerpulse score --input posts.json --date 2024-01-01
//! tickerpulse rebuild --dir exports/
//! tickerpulse history --ticker TSLA --days 7
//! tickerpulse analyze "Huge growth ahead, very bullish"
//! ```
//!
//! # Environment Variables
//! - `DATABASE_URL` - SQLite database (default: sqlite://tickerpulse.db)
//! - `DB_MAX_CONNECTIONS` - Connection pool size (default: 5)
//! - `LEXICON_PATH` - Optional TOML file with extra financial terms
//! - `PARALLEL_SCORING` - Score posts on all cores (default: true)

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tickerpulse::application::bootstrap::Application;
use tickerpulse::application::bootstrap::scoring::ScoringBootstrap;
use tickerpulse::config::Config;
use tickerpulse::infrastructure::ingest::{dated_input_files, load_posts, parse_batch_date};
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Daily ticker sentiment rollup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one input file and roll it up into the daily summary
    Score {
        /// CSV, JSON or JSON Lines file of posts
        #[arg(short, long)]
        input: PathBuf,

        /// Batch date (YYYY-MM-DD), defaults to today (UTC)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Re-process every dated input file in a directory, oldest first
    Rebuild {
        /// Directory holding files named like reddit_analysis_complete_YYYYMMDD_*.csv
        #[arg(short, long)]
        dir: PathBuf,
    },
    /// Print the most recent daily summaries for a ticker as JSON lines
    History {
        #[arg(short, long)]
        ticker: String,

        /// Number of days to show
        #[arg(long, default_value = "30")]
        days: usize,
    },
    /// Show the hybrid score breakdown of a piece of text
    Analyze {
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let log_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(log_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Score { input, date } => {
            let date = match date {
                Some(date) => parse_batch_date(&date)?,
                None => Utc::now().date_naive(),
            };
            let app = Application::build(&config).await?;
            let posts = load_posts(&input)?;
            let report = app.pipeline.score_and_aggregate(&posts, date).await?;
            println!("{}", serde_json::to_string(&report)?);
        }
        Commands::Rebuild { dir } => {
            let files = dated_input_files(&dir)?;
            if files.is_empty() {
                warn!("No dated input files found in {}", dir.display());
                return Ok(());
            }

            let app = Application::build(&config).await?;
            info!("Rebuilding from {} files", files.len());
            for (date, path) in files {
                let posts = load_posts(&path)?;
                let report = app
                    .pipeline
                    .score_and_aggregate(&posts, date)
                    .await
                    .with_context(|| format!("Failed to process {}", path.display()))?;
                println!("{}", serde_json::to_string(&report)?);
            }
        }
        Commands::History { ticker, days } => {
            let app = Application::build(&config).await?;
            let rows = app
                .persistence
                .sentiment_repository
                .ticker_history(&ticker.to_uppercase(), days)
                .await?;
            if rows.is_empty() {
                warn!("No summaries stored for {}", ticker);
            }
            for row in rows {
                println!("{}", serde_json::to_string(&row)?);
            }
        }
        Commands::Analyze { text } => {
            let aggregator = ScoringBootstrap::init(&config)?;
            let breakdown = aggregator.scorer().explain(&text);
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
        }
    }

    Ok(())
}
