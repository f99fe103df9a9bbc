use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use exhub_review::{init_tracing, Config, ReviewService};
use srs_core::Rating;

#[derive(Parser)]
#[command(name = "exhub-review", version, about = "Spaced repetition review tool")]
struct Cli {
    /// Database path (overrides EXHUB_DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new card, due immediately
    Add { front: String, back: String },
    /// Record a review for a card
    Review {
        card_id: i64,
        /// again, hard, good or easy
        rating: Rating,
    },
    /// Show cards due this study day
    Due {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show review statistics
    Stats,
    /// Delete a card and its history
    Delete { card_id: i64 },
}

fn main() -> anyhow::Result<()> {
    init_tracing("info");
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.database {
        config.database_path = path;
    }
    let service = ReviewService::from_config(&config)
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    let now = Utc::now();

    match cli.command {
        Command::Add { front, back } => {
            let id = service.add_card(&front, &back, now)?;
            println!("{}", id);
        }
        Command::Review { card_id, rating } => {
            let outcome = service.review(card_id, rating, now)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Due { limit } => {
            let queue = match limit {
                Some(limit) => service.study_queue_with_limit(now, limit)?,
                None => service.study_queue(now)?,
            };
            println!("{}", serde_json::to_string_pretty(&queue)?);
        }
        Command::Stats => {
            let stats = service.stats(now)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Delete { card_id } => {
            service.delete_card(card_id)?;
        }
    }

    Ok(())
}
