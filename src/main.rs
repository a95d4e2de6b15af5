//! stagecache - offline-first festival data in the terminal.
//!
//! Runs one fetch-or-reuse cycle against the festival content API and prints
//! a roster/schedule summary. `--offline` skips the network entirely and
//! shows whatever snapshot is persisted; `--force-refetch` bypasses the
//! freshness window for this one cycle.

use std::io;
use std::sync::Arc;

use anyhow::Result;
use chrono::DateTime;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stagecache::cache::FileCacheStore;
use stagecache::config::Config;
use stagecache::orchestrator::FetchOrchestrator;
use stagecache::prefetch::ImagePrefetcher;
use stagecache::{ApiClient, DataFacade, LoadState, Locale, Snapshot};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Set up logging with environment-based filter
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("stagecache starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let force_refetch = args.iter().any(|a| a == "--force-refetch");
    let offline = args.iter().any(|a| a == "--offline");
    let locale_arg = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(|a| a.parse::<Locale>())
        .transpose()?;

    let config = Config::load()?;
    let data_dir = config.data_dir()?;

    let api = ApiClient::new(config.base_url())?;
    let cache = Arc::new(FileCacheStore::new(data_dir.join("cache"))?);
    let orchestrator = FetchOrchestrator::new(api, cache, ImagePrefetcher::default());
    let facade = DataFacade::new(orchestrator, &data_dir.join("prefs"))?;

    // CLI argument wins, then the persisted language preference
    let locale = locale_arg
        .or(config.locale)
        .unwrap_or_else(|| facade.language());

    let state = if offline {
        facade.restore()
    } else {
        facade.load(locale, force_refetch).await
    };

    match state {
        LoadState::Ready(snapshot) => {
            print_summary(&snapshot, facade.liked_artists().len());
            Ok(())
        }
        LoadState::Errored(e) => anyhow::bail!("No data available: {}", e),
        LoadState::Idle | LoadState::Loading => unreachable!("fetch cycle already settled"),
    }
}

fn print_summary(snapshot: &Snapshot, liked_count: usize) {
    let fetched = DateTime::from_timestamp_millis(snapshot.timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!(
        "{} artists, {} locations, {} sessions [{}] - fetched {}",
        snapshot.artists.len(),
        snapshot.locations.len(),
        snapshot.sessions.len(),
        snapshot.locale,
        fetched,
    );
    if liked_count > 0 {
        println!("{} liked artists", liked_count);
    }

    for session in &snapshot.sessions {
        let location = session
            .location
            .as_ref()
            .map(|l| l.name.as_str())
            .unwrap_or("TBA");
        println!(
            "{} {}-{}  {} @ {}",
            session.date, session.time_start, session.time_end, session.name, location
        );
    }
}
