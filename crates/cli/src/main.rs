use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zimshelf_core::config::{load_config, Config};
use zimshelf_core::lang::LanguageCollector;
use zimshelf_core::library::{
    FeedFetcher, HttpFeedFetcher, LibraryRefresher, LibraryState, LibraryStore, Preferences,
    SqliteLibraryStore,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("ZIMSHELF_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        Config::default()
    };

    let store = Arc::new(
        SqliteLibraryStore::new(Path::new(&config.database.path))
            .context("Failed to open library database")?,
    );

    let command = std::env::args().nth(1).unwrap_or_default();
    match command.as_str() {
        "refresh" => refresh(&config, store).await,
        "languages" => languages(store),
        "stats" => stats(store),
        _ => {
            eprintln!("Usage: zimshelf <refresh|languages|stats>");
            std::process::exit(2);
        }
    }
}

/// Run a user-initiated catalog refresh.
async fn refresh(config: &Config, store: Arc<SqliteLibraryStore>) -> Result<()> {
    let fetcher = Arc::new(HttpFeedFetcher::new(&config.catalog));
    let refresher = LibraryRefresher::new(
        config.catalog.clone(),
        fetcher as Arc<dyn FeedFetcher>,
        Arc::clone(&store) as Arc<dyn LibraryStore>,
        store as Arc<dyn Preferences>,
    );

    refresher.start(true).await;
    match refresher.state() {
        LibraryState::Complete => {
            info!("Refresh complete");
            Ok(())
        }
        _ => {
            let error = refresher
                .error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string());
            anyhow::bail!("Refresh failed: {error}")
        }
    }
}

/// Print catalog languages with entry counts, sorted by name.
fn languages(store: Arc<SqliteLibraryStore>) -> Result<()> {
    let mut collector = LanguageCollector::new();
    for (codes, count) in store.language_counts()? {
        collector.add_languages(&codes, count as i64);
    }
    println!("{}", serde_json::to_string_pretty(&collector.languages())?);
    Ok(())
}

/// Print record and category counts.
fn stats(store: Arc<SqliteLibraryStore>) -> Result<()> {
    let total = store.zim_file_ids()?.len();
    let index = store.category_languages()?;
    let stats = serde_json::json!({
        "zim_files": total,
        "categories": index.len(),
        "last_refresh": store.last_refresh().map(|dt| dt.to_rfc3339()),
    });
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
