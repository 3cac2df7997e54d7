// src/repositories/row_fetcher.rs
//
// Row Fetcher - typed single-table reads over a CatalogBackend.
//
// One backend round trip per call, no caching. Keyed single-row lookups
// never pick among several rows: zero rows is NotFound, more than one is
// Ambiguous.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::catalog_backend::{CatalogBackend, Row, SelectQuery, Table};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct RowFetcher {
    backend: Arc<dyn CatalogBackend>,
}

impl RowFetcher {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self { backend }
    }

    /// All rows matching `query`, decoded as `T`
    pub async fn fetch_rows<T: DeserializeOwned>(&self, query: &SelectQuery) -> AppResult<Vec<T>> {
        let rows = self.backend.select(query).await?;
        log::debug!("Fetched {} rows from {}", rows.len(), query.table);
        rows.into_iter().map(decode_row).collect()
    }

    /// Like `fetch_rows`, but rows that fail to decode are logged and
    /// skipped. Only a failed backend read is an error.
    pub async fn fetch_decodable<T: DeserializeOwned>(&self, query: &SelectQuery) -> AppResult<Vec<T>> {
        let rows = self.backend.select(query).await?;
        let total = rows.len();

        let decoded: Vec<T> = rows
            .into_iter()
            .filter_map(|row| {
                let label = row_label(&row);
                decode_row(row)
                    .map_err(|e| log::warn!("Skipping {} row {}: {}", query.table, label, e))
                    .ok()
            })
            .collect();

        log::debug!("Decoded {} of {} rows from {}", decoded.len(), total, query.table);
        Ok(decoded)
    }

    /// The single row of `table` where `column = value`
    pub async fn fetch_single<T: DeserializeOwned>(
        &self,
        table: Table,
        column: &str,
        value: impl Into<Value>,
    ) -> AppResult<T> {
        let value = value.into();
        let query = SelectQuery::from(table).eq(column, value.clone());
        let mut rows = self.backend.select(&query).await?;

        match rows.len() {
            0 => Err(AppError::NotFound {
                table: table.to_string(),
                column: column.to_string(),
                value: display_value(&value),
            }),
            1 => decode_row(rows.remove(0)),
            count => Err(AppError::Ambiguous {
                table: table.to_string(),
                column: column.to_string(),
                value: display_value(&value),
                count,
            }),
        }
    }
}

fn decode_row<T: DeserializeOwned>(row: Row) -> AppResult<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

/// Best identifier of a raw row for log lines
fn row_label(row: &Row) -> String {
    ["id", "content_id", "season_id", "episode_id"]
        .iter()
        .find_map(|column| row.get(*column))
        .map(display_value)
        .unwrap_or_else(|| "<unidentified>".to_string())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
