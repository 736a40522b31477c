mod config;
mod history;
mod models;
mod notify;
mod recent;
mod search;
mod session;
mod storage;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use history::HistoryStore;
use notify::TracingNotifier;
use recent::RecentViews;
use search::{display_price, BlockReason, Category, HttpSearchBackend};
use session::{SearchSession, SessionOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use storage::{FileStorage, KeyValueStore};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// apt-search - natural-language apartment search
#[derive(Parser)]
#[command(name = "apt-search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search Korean apartment listings in plain language")]
struct Cli {
    /// Base URL of the real-estate API
    #[arg(long)]
    api_url: Option<String>,

    /// Directory for search history and recent views
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an AI search, e.g. `search 강남구 30평대 전세`
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show (or clear) past AI searches
    History {
        #[arg(long)]
        clear: bool,
    },
    /// Mark an apartment from search history as viewed
    View { apt_id: i64 },
    /// Show, prune or clear recently viewed apartments
    Recent {
        #[arg(long, value_name = "APT_ID")]
        remove: Option<i64>,
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStorage::new(&config.data_dir));

    match cli.command {
        Command::Search { query } => run_search(&config, storage, &query.join(" ")).await,
        Command::History { clear } => show_history(&config, storage, clear),
        Command::View { apt_id } => record_view(storage, apt_id),
        Command::Recent { remove, clear } => show_recent(storage, remove, clear),
    }
}

fn open_session(config: &AppConfig, storage: Arc<dyn KeyValueStore>) -> Result<SearchSession> {
    let backend = HttpSearchBackend::new(config)?;
    debug!("AI search endpoint: {}", backend.endpoint());
    Ok(SearchSession::new(Arc::new(backend), storage, Arc::new(TracingNotifier)))
}

async fn run_search(config: &AppConfig, storage: Arc<dyn KeyValueStore>, query: &str) -> Result<()> {
    info!("🏠 apt-search - AI apartment search");
    info!("API: {}", config.api_url);

    let session = open_session(config, storage)?;

    let outcome = tokio::select! {
        outcome = session.search(query) => outcome,
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            debug!("Request state after cancel: {:?}", session.state());
            SessionOutcome::Superseded
        }
    };

    match outcome {
        SessionOutcome::Found(entry) => {
            let category = Category::infer(&entry.criteria);
            info!("\n✅ {} listings ({})\n", entry.apartments.len(), category.label());

            for (i, apt) in entry.apartments.iter().enumerate() {
                println!("{}. {} ({})", i + 1, apt.apt_name, display_price(apt, category));
                println!("   {}", apt.address);
                println!("   ID: {}", apt.apt_id);
                println!("   Location: {:.5}, {:.5}", apt.location.lat, apt.location.lng);
                println!();
            }
        }
        SessionOutcome::NoMatches { query } => {
            println!("No listings with price data for {:?}", query);
        }
        SessionOutcome::Failed(error) => {
            if let Some(at) = session.cooldown().last_request_at {
                let retry_at = at + chrono::Duration::milliseconds(search::gate::COOLDOWN_MS);
                info!("Retry allowed after {}", retry_at.format("%H:%M:%S%.3f"));
            }
            anyhow::bail!("AI search failed: {}", error);
        }
        SessionOutcome::Blocked(BlockReason::TooShort) => {
            anyhow::bail!("Query must be at least {} characters", search::gate::MIN_QUERY_CHARS);
        }
        SessionOutcome::Blocked(reason) => {
            warn!("Search not sent: {:?}", reason);
        }
        SessionOutcome::Superseded => {
            info!("Search cancelled");
        }
    }

    Ok(())
}

fn show_history(config: &AppConfig, storage: Arc<dyn KeyValueStore>, clear: bool) -> Result<()> {
    let session = open_session(config, storage)?;

    if clear {
        session.clear_history();
        return Ok(());
    }

    let history = session.history();
    if history.is_empty() {
        println!("No AI searches yet");
    }
    for entry in history {
        println!(
            "[{}] {} ({} listings)",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.query,
            entry.apartments.len()
        );
    }
    Ok(())
}

fn record_view(storage: Arc<dyn KeyValueStore>, apt_id: i64) -> Result<()> {
    let history = HistoryStore::open(storage.clone());

    let apartment = history
        .to_vec()
        .into_iter()
        .flat_map(|entry| entry.apartments)
        .find(|apt| apt.apt_id == apt_id)
        .with_context(|| format!("Apartment {} is not in search history", apt_id))?;

    let mut recent = RecentViews::open(storage);
    recent.record(&apartment, chrono::Utc::now());
    println!("Viewed {} ({})", apartment.apt_name, apartment.address);
    Ok(())
}

fn show_recent(storage: Arc<dyn KeyValueStore>, remove: Option<i64>, clear: bool) -> Result<()> {
    let mut recent = RecentViews::open(storage);

    if clear {
        recent.clear();
        info!("🗑️ Cleared recent views");
        return Ok(());
    }

    if let Some(apt_id) = remove {
        if !recent.remove(apt_id) {
            warn!("Apartment {} was not in recent views", apt_id);
        }
    }

    for view in recent.list() {
        println!(
            "[{}] {} - {} (ID: {})",
            view.viewed_at.format("%Y-%m-%d %H:%M"),
            view.apt_name,
            view.address,
            view.apt_id
        );
    }
    Ok(())
}
