//! Footfall CLI
//!
//! Command-line interface for the visit ledger:
//! - Record a visit (the page-load analog)
//! - Show reconciled stats
//! - Export visit records to CSV
//! - Render page fragments
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use footfall::config::{generate_default_config, Config};
use footfall::site::{self, MapPayload, MapView, NewsFeed};
use footfall::storage::{RegionAggregate, VisitStore};
use footfall::VisitLedger;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "footfall")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Visit analytics for a static personal homepage")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a visit and print the refreshed stats
    Visit,

    /// Show reconciled stats without recording a visit
    Stats,

    /// Export visit records to CSV
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a page fragment
    Render {
        /// Which fragment to rebuild
        target: RenderTarget,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RenderTarget {
    News,
    Publications,
    Map,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_tracing(&config);

    match cli.command {
        Commands::Visit => {
            let ledger = VisitLedger::from_config(&config);
            let snapshot = ledger.init().await;

            println!("Total visits: {}", snapshot.total_visits);
            println!("Today ({}): {}", snapshot.daily.date, snapshot.daily.count);
            match &snapshot.new_visit {
                Some(record) => println!("Recorded visit from {}", record.region_label),
                None => println!("No new location recorded"),
            }
        }

        Commands::Stats => {
            let ledger = VisitLedger::from_config(&config);
            let snapshot = ledger.stats().await;

            println!("Total visits: {}", snapshot.total_visits);
            println!("Today ({}): {}", snapshot.daily.date, snapshot.daily.count);
            for region in &snapshot.regions {
                println!("  {} - {}", region.region_label, region.count);
            }
        }

        Commands::Export { output } => {
            let store = VisitStore::open(config.storage.store_path());
            let records = store.visit_records();

            let writer: Box<dyn std::io::Write> = match &output {
                Some(path) => Box::new(
                    std::fs::File::create(path)
                        .with_context(|| format!("creating {}", path.display()))?,
                ),
                None => Box::new(std::io::stdout()),
            };

            let mut csv_writer = csv::Writer::from_writer(writer);
            csv_writer.write_record(["date", "timestamp", "latitude", "longitude", "region"])?;
            for record in &records {
                let latitude = record.latitude.to_string();
                let longitude = record.longitude.to_string();
                csv_writer.write_record([
                    record.date.as_str(),
                    record.timestamp.as_str(),
                    latitude.as_str(),
                    longitude.as_str(),
                    record.region_label.as_str(),
                ])?;
            }
            csv_writer.flush()?;

            tracing::info!(records = records.len(), "Export complete");
        }

        Commands::Render { target, output } => {
            let fragment = match target {
                RenderTarget::News => {
                    let feed = NewsFeed::load(&config.site.news_path);
                    site::render_news(feed.latest())
                }
                RenderTarget::Publications => {
                    let publications =
                        site::publications::load_publications(&config.site.publications_path);
                    site::render_publications(&publications, &config.site.owner_name)
                }
                RenderTarget::Map => {
                    let store = VisitStore::open(config.storage.store_path());
                    let aggregates = RegionAggregate::group(&store.visit_records());
                    MapPayload::new(MapView::default(), &aggregates).to_json()
                }
            };

            match &output {
                Some(path) => std::fs::write(path, fragment)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{fragment}"),
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match &output {
                Some(path) => std::fs::write(path, content)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{content}"),
            }
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("footfall={}", config.logging.level).into());

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
