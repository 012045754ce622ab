//! Command-line interface for the bill publisher.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use parlamento_bills::dates::parse_date;
use parlamento_bills::{classify, ClassifyContext, RawBill};
use tracing::info;

use crate::config::PublisherConfig;
use crate::error::Result;
use crate::importer::{BillImporter, BILL_ROLE};
use crate::queue::PublishQueue;
use crate::store::HttpBillStore;

/// Parlamento Publisher - classify scraped bills and publish them to the Popolo store.
#[derive(Parser)]
#[command(name = "parlamento-publish")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import raw bills from a JSON array or JSON-lines file.
    Import {
        /// File with scraper output
        file: PathBuf,

        /// Reference date for parliamentary-period expiry (default: today)
        #[arg(long)]
        today: Option<String>,

        /// Print the classified bills instead of publishing them
        #[arg(long)]
        dry_run: bool,
    },
}

/// Run the CLI.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            file,
            today,
            dry_run,
        } => import_command(&file, today.as_deref(), dry_run).await,
    }
}

/// Read scraper output from `file`, one JSON array or one bill per line.
async fn read_bills(file: &Path) -> Result<Vec<RawBill>> {
    let input = tokio::fs::read_to_string(file).await?;
    Ok(RawBill::batch_from_json(&input)?)
}

async fn import_command(file: &Path, today: Option<&str>, dry_run: bool) -> Result<()> {
    let bills = read_bills(file).await?;
    let today = today.map(parse_date).transpose()?;

    info!(file = %file.display(), count = bills.len(), dry_run, "importing bills");

    if dry_run {
        let ctx = today.map(ClassifyContext::at).unwrap_or_else(ClassifyContext::today);
        for raw in bills {
            let bill = classify(raw, &ctx);
            println!("{}", serde_json::to_string(&bill)?);
        }
        return Ok(());
    }

    let config = PublisherConfig::from_env()?;
    let store = Arc::new(HttpBillStore::new(&config)?);
    let queue = PublishQueue::from_config(store, &config);

    let mut importer = BillImporter::new(queue);
    if let Some(today) = today {
        importer = importer.with_today(today);
    }

    for raw in bills {
        let id = raw.file.clone();
        importer.store(&id, raw, BILL_ROLE, || {});
    }

    let stats = importer.finish().await;
    println!(
        "created: {}, updated: {}, dropped: {}, unexpected status: {}",
        stats.created, stats.updated, stats.dropped, stats.unexpected_status
    );
    Ok(())
}
