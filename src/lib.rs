// src/lib.rs
// StreamVault - catalog query layer for the streaming front end
//
// Architecture:
// - Backends are dumb row sources behind one trait
// - The aggregator joins entries with their details, fail-soft per item
// - Every consumer query goes through the keyed query cache
// - Application layer shapes results for pages and the CLI

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod app;
pub mod application;
pub mod integrations;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    ContentDetail,
    ContentEntry,
    ContentKind,
    EnrichedContent,
    EpisodeDetail,
    GenreFilter,
    MovieDetail,
    ResolvedSeason,
    ResolvedWebSeries,
    SeasonDetail,
    WebSeriesDetail,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Backends
// ============================================================================

pub use repositories::{
    CatalogBackend,
    CatalogSnapshot,
    MemoryBackend,
    RowFetcher,
    SelectQuery,
    SqliteBackend,
    Table,
};

pub use integrations::SupabaseClient;

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    CachePolicies,
    CatalogQueries,
    ContentAggregator,
    QueryCache,
    QueryKey,
    RelationWalker,
    RetryPolicy,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use app::{AppConfig, BackendConfig};
pub use application::AppState;

pub use application::commands;
pub use application::dto;
