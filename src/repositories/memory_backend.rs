// src/repositories/memory_backend.rs
//
// In-process catalog tables, loaded from a JSON snapshot.
//
// Snapshot format: one key per table, each holding an array of row objects:
// { "upload_content": [...], "movie": [...], "web_series": [...], ... }

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use super::catalog_backend::{compare_rows, CatalogBackend, Row, SelectQuery, Table};
use crate::error::{AppError, AppResult};

/// Full dump of the catalog tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub upload_content: Vec<Row>,
    #[serde(default)]
    pub movie: Vec<Row>,
    #[serde(default)]
    pub web_series: Vec<Row>,
    #[serde(default)]
    pub season: Vec<Row>,
    #[serde(default)]
    pub episode: Vec<Row>,
}

impl CatalogSnapshot {
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn rows(&self, table: Table) -> &[Row] {
        match table {
            Table::UploadContent => &self.upload_content,
            Table::Movie => &self.movie,
            Table::WebSeries => &self.web_series,
            Table::Season => &self.season,
            Table::Episode => &self.episode,
        }
    }

    pub fn rows_mut(&mut self, table: Table) -> &mut Vec<Row> {
        match table {
            Table::UploadContent => &mut self.upload_content,
            Table::Movie => &mut self.movie,
            Table::WebSeries => &mut self.web_series,
            Table::Season => &mut self.season,
            Table::Episode => &mut self.episode,
        }
    }

    /// Append a row; `value` must be a JSON object
    pub fn push(&mut self, table: Table, value: Value) -> AppResult<()> {
        match value {
            Value::Object(row) => {
                self.rows_mut(table).push(row);
                Ok(())
            }
            other => Err(AppError::InvalidQuery(format!(
                "Row for {} must be an object, got {}",
                table, other
            ))),
        }
    }

    pub fn total_rows(&self) -> usize {
        Table::ALL.iter().map(|t| self.rows(*t).len()).sum()
    }
}

/// Catalog backend over in-memory tables
pub struct MemoryBackend {
    tables: HashMap<Table, Vec<Row>>,
}

impl MemoryBackend {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        let tables = Table::ALL
            .into_iter()
            .map(|t| (t, snapshot.rows(t).to_vec()))
            .collect();

        Self { tables }
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let snapshot = CatalogSnapshot::load(path)?;
        log::info!("Loaded {} catalog rows from {}", snapshot.total_rows(), path.display());
        Ok(Self::new(snapshot))
    }

    fn run(&self, query: &SelectQuery) -> AppResult<Vec<Row>> {
        query.validate()?;

        let mut rows: Vec<Row> = self
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| match &query.filter {
                        Some(filter) => row.get(&filter.column) == Some(&filter.value),
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if !query.order.is_empty() {
            // stable: rows equal on every key keep insertion order
            rows.sort_by(|a, b| compare_rows(a, b, &query.order));
        }

        Ok(rows)
    }
}

#[async_trait]
impl CatalogBackend for MemoryBackend {
    async fn select(&self, query: &SelectQuery) -> AppResult<Vec<Row>> {
        self.run(query)
    }
}
