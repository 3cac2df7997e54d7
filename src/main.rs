// src/main.rs
//
// streamvault - query the catalog from the command line, printing JSON

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use streamvault::app::config::{ENV_BACKEND, ENV_DB_PATH, ENV_SNAPSHOT};
use streamvault::app::{init_app_state, open_sqlite_backend, AppConfig, BackendConfig};
use streamvault::application::commands::*;
use streamvault::application::AppState;
use streamvault::db::CATALOG_TABLES;
use streamvault::repositories::CatalogSnapshot;

#[derive(Parser)]
#[command(name = "streamvault")]
#[command(about = "Query the StreamVault catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog backend (overrides STREAMVAULT_BACKEND)
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    /// SQLite database file (overrides STREAMVAULT_DB_PATH)
    #[arg(long = "db-path")]
    db_path: Option<PathBuf>,

    /// JSON snapshot for the memory backend (overrides STREAMVAULT_SNAPSHOT)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendKind {
    Sqlite,
    Rest,
    Memory,
}

impl BackendKind {
    fn name(self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::Rest => "rest",
            BackendKind::Memory => "memory",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// All content, split into movies and web series
    All,
    /// Content featured under a tag ("Type Popular", "Home Hero", ...)
    Feature {
        tag: String,
    },
    /// Content in a genre ("Comedy", "Action & Adventure", ...)
    Genre {
        genre: String,
    },
    /// Home page hero banner
    Hero,
    /// Web series page: hero slider and rails
    WebSeries,
    /// Keep all content refreshed and report every refresh
    Watch,
    /// Create the SQLite schema, optionally importing a JSON snapshot
    InitDb {
        /// Snapshot to import
        #[arg(long = "import")]
        import: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let compact = cli.compact;

    match cli.command {
        Commands::InitDb { import } => init_db(&config, import).await,
        Commands::Watch => watch(&config).await,
        Commands::All => {
            let state = open_state(&config)?;
            print(&get_all_content(&state).await.map_err(anyhow::Error::msg)?, compact)
        }
        Commands::Feature { tag } => {
            let state = open_state(&config)?;
            print(&get_content_by_feature(tag, &state).await.map_err(anyhow::Error::msg)?, compact)
        }
        Commands::Genre { genre } => {
            let state = open_state(&config)?;
            print(&get_content_by_genre(genre, &state).await.map_err(anyhow::Error::msg)?, compact)
        }
        Commands::Hero => {
            let state = open_state(&config)?;
            print(&get_home_hero(&state).await.map_err(anyhow::Error::msg)?, compact)
        }
        Commands::WebSeries => {
            let state = open_state(&config)?;
            print(&get_web_series_page(&state).await.map_err(anyhow::Error::msg)?, compact)
        }
    }
}

/// Environment configuration with the CLI flags layered on top
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut overrides: Vec<(&str, String)> = Vec::new();
    if let Some(kind) = cli.backend {
        overrides.push((ENV_BACKEND, kind.name().to_string()));
    }
    if let Some(path) = &cli.db_path {
        overrides.push((ENV_DB_PATH, path.display().to_string()));
    }
    if let Some(path) = &cli.snapshot {
        overrides.push((ENV_SNAPSHOT, path.display().to_string()));
    }

    let config = AppConfig::from_lookup(|name| {
        overrides
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.clone())
            .or_else(|| std::env::var(name).ok())
    })?;

    log::debug!("Using {} backend", config.backend.name());
    Ok(config)
}

fn open_state(config: &AppConfig) -> Result<AppState> {
    init_app_state(config).context("Failed to open the catalog backend")
}

fn print<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", json);
    Ok(())
}

async fn init_db(config: &AppConfig, import: Option<PathBuf>) -> Result<()> {
    let BackendConfig::Sqlite { db_path, pool_size } = &config.backend else {
        bail!("init-db needs the sqlite backend, not {}", config.backend.name());
    };

    let backend = open_sqlite_backend(db_path, *pool_size)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;
    log::info!("Schema ready at {}", db_path.display());

    if let Some(path) = import {
        let snapshot = CatalogSnapshot::load(&path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let inserted = backend.import(snapshot).await?;
        log::info!("Imported {} rows from {}", inserted, path.display());
    }

    let stats = backend.stats().await?;
    for table in CATALOG_TABLES {
        println!("{:<16} {}", table, stats.count(table).unwrap_or(0));
    }
    Ok(())
}

async fn watch(config: &AppConfig) -> Result<()> {
    let state = open_state(config)?;
    let period = config.cache.all_content.refetch_interval;
    let _watch = state.catalog.watch_all_content();

    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match state.catalog.all_content().await {
                    Ok(content) => log::info!("all-content: {} entries", content.len()),
                    Err(e) => log::error!("all-content unavailable: {}", e),
                }
                let evicted = state.catalog.evict_idle();
                if evicted > 0 {
                    log::debug!("Evicted {} idle queries", evicted);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopping");
                return Ok(());
            }
        }
    }
}
