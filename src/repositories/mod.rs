// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Backends are DUMB row sources
// - NO business logic
// - NO cross-table joins (the aggregator walks relations)
// - Explicit SQL / explicit query strings only

pub mod catalog_backend;
pub mod memory_backend;
pub mod row_fetcher;
pub mod sqlite_backend;

pub use catalog_backend::{
    compare_rows, validate_column, CatalogBackend, Filter, OrderBy, Row, SelectQuery, Table,
};
pub use memory_backend::{CatalogSnapshot, MemoryBackend};
pub use row_fetcher::RowFetcher;
pub use sqlite_backend::SqliteBackend;
