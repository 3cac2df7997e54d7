// src/app/catalog_init.rs
//
// Catalog Initialization
//
// Wires a configured backend into the cached catalog queries and the
// application state the commands run against.
//
// CRITICAL RULES:
// - The SQLite schema is initialized before the first query
// - Every backend is handed out as Arc<dyn CatalogBackend>
// - Nothing here queries catalog rows

use std::path::Path;
use std::sync::Arc;

use super::config::{AppConfig, BackendConfig};
use crate::application::AppState;
use crate::db::{create_connection_pool, get_connection, initialize_database};
use crate::error::AppResult;
use crate::integrations::SupabaseClient;
use crate::repositories::{CatalogBackend, MemoryBackend, SqliteBackend};
use crate::services::CatalogQueries;

// ============================================================================
// BACKENDS
// ============================================================================

/// Open (and if needed create) the SQLite catalog at `db_path`
pub fn open_sqlite_backend(db_path: &Path, pool_size: u32) -> AppResult<SqliteBackend> {
    let pool = create_connection_pool(db_path, pool_size)?;
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
    }
    Ok(SqliteBackend::new(Arc::new(pool)))
}

pub fn connect_backend(config: &BackendConfig) -> AppResult<Arc<dyn CatalogBackend>> {
    let backend: Arc<dyn CatalogBackend> = match config {
        BackendConfig::Sqlite { db_path, pool_size } => {
            log::info!("Using SQLite catalog at {}", db_path.display());
            Arc::new(open_sqlite_backend(db_path, *pool_size)?)
        }
        BackendConfig::Rest { url, api_key, timeout } => {
            log::info!("Using REST catalog at {}", url);
            Arc::new(SupabaseClient::new(url, api_key, *timeout)?)
        }
        BackendConfig::Memory { snapshot } => {
            log::info!("Using in-memory catalog from {}", snapshot.display());
            Arc::new(MemoryBackend::from_file(snapshot)?)
        }
    };

    Ok(backend)
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

pub fn init_app_state(config: &AppConfig) -> AppResult<AppState> {
    let backend = connect_backend(&config.backend)?;
    Ok(app_state_for(backend, config))
}

pub fn app_state_for(backend: Arc<dyn CatalogBackend>, config: &AppConfig) -> AppState {
    AppState {
        catalog: Arc::new(CatalogQueries::new(backend, config.cache)),
    }
}
