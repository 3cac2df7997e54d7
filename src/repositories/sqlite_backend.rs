// src/repositories/sqlite_backend.rs
//
// Catalog backend over a local SQLite mirror of the hosted tables.
//
// Array columns (genre, feature_in, *_id_list) are stored as JSON text and
// decoded back into arrays on read, so rows look the same as the hosted
// backend's. Timestamps are stored as UTC with microsecond precision, so
// their text order is their time order.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, Row as SqlRow};
use serde_json::{Number, Value};
use std::sync::Arc;

use super::catalog_backend::{validate_column, CatalogBackend, Row, SelectQuery, Table};
use super::memory_backend::CatalogSnapshot;
use crate::db::{get_database_stats, ConnectionPool, DatabaseStats};
use crate::error::{AppError, AppResult};

/// Columns holding JSON arrays
const ARRAY_COLUMNS: [&str; 4] = ["genre", "feature_in", "season_id_list", "episode_id_list"];

/// Columns holding RFC 3339 timestamps
const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

pub struct SqliteBackend {
    pool: Arc<ConnectionPool>,
}

impl SqliteBackend {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Insert every row of `snapshot`, in one transaction
    pub async fn import(&self, snapshot: CatalogSnapshot) -> AppResult<usize> {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || -> AppResult<usize> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            let mut inserted = 0;
            for table in Table::ALL {
                for row in snapshot.rows(table) {
                    insert_row(&tx, table, row)?;
                    inserted += 1;
                }
            }
            tx.commit()?;
            Ok(inserted)
        })
        .await
        .map_err(|e| AppError::Other(format!("SQLite import task failed: {}", e)))?
    }

    /// Row counts of the catalog tables
    pub async fn stats(&self) -> AppResult<DatabaseStats> {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || -> AppResult<DatabaseStats> {
            let conn = pool.get()?;
            get_database_stats(&conn)
        })
        .await
        .map_err(|e| AppError::Other(format!("SQLite stats task failed: {}", e)))?
    }

    fn select_blocking(pool: &ConnectionPool, query: &SelectQuery) -> AppResult<Vec<Row>> {
        query.validate()?;
        let conn = pool.get()?;

        let (sql, params) = build_select(query)?;
        let mut stmt = conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt
            .query_map(params_from_iter(params), |row| row_to_json(row, &names))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

#[async_trait]
impl CatalogBackend for SqliteBackend {
    async fn select(&self, query: &SelectQuery) -> AppResult<Vec<Row>> {
        let pool = Arc::clone(&self.pool);
        let query = query.clone();
        tokio::task::spawn_blocking(move || Self::select_blocking(&pool, &query))
            .await
            .map_err(|e| AppError::Other(format!("SQLite query task failed: {}", e)))?
    }
}

/// Build the SELECT statement. Column names must already be validated.
fn build_select(query: &SelectQuery) -> AppResult<(String, Vec<SqlValue>)> {
    let mut sql = format!("SELECT * FROM {}", query.table.as_str());
    let mut params = Vec::new();

    if let Some(filter) = &query.filter {
        sql.push_str(&format!(" WHERE {} = ?1", filter.column));
        params.push(json_to_sql(&filter.value)?);
    }

    if !query.order.is_empty() {
        let keys: Vec<String> = query
            .order
            .iter()
            .map(|o| {
                // match the relational convention: NULLs are the largest value
                if o.descending {
                    format!("{} DESC NULLS FIRST", o.column)
                } else {
                    format!("{} ASC NULLS LAST", o.column)
                }
            })
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&keys.join(", "));
    }

    Ok((sql, params))
}

fn json_to_sql(value: &Value) -> AppResult<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::Bool(b) => Ok(SqlValue::Integer(*b as i64)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(SqlValue::Integer(i)),
            None => Ok(SqlValue::Real(n.as_f64().unwrap_or_default())),
        },
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Array(_) => Ok(SqlValue::Text(value.to_string())),
        Value::Object(_) => Err(AppError::InvalidQuery(
            "Object values cannot be stored in a catalog column".to_string(),
        )),
    }
}

fn row_to_json(row: &SqlRow, names: &[String]) -> rusqlite::Result<Row> {
    let mut out = Row::new();
    for (idx, name) in names.iter().enumerate() {
        let value = match row.get_ref(idx)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Number(i.into()),
            ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
            ValueRef::Text(bytes) => {
                let text = String::from_utf8_lossy(bytes);
                if ARRAY_COLUMNS.contains(&name.as_str()) {
                    serde_json::from_str(&text).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
                    })?
                } else {
                    Value::String(text.into_owned())
                }
            }
            ValueRef::Blob(_) => {
                return Err(rusqlite::Error::InvalidColumnType(
                    idx,
                    name.clone(),
                    rusqlite::types::Type::Blob,
                ))
            }
        };
        out.insert(name.clone(), value);
    }
    Ok(out)
}

fn insert_row(conn: &Connection, table: Table, row: &Row) -> AppResult<()> {
    let columns: Vec<&String> = row.keys().collect();
    for column in &columns {
        validate_column(column)?;
    }

    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.as_str(),
        columns.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", "),
        placeholders.join(", ")
    );

    let values = row
        .iter()
        .map(|(column, value)| {
            if TIMESTAMP_COLUMNS.contains(&column.as_str()) {
                json_to_sql(&normalize_timestamp(value))
            } else {
                json_to_sql(value)
            }
        })
        .collect::<AppResult<Vec<_>>>()?;
    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

/// `value` as fixed-width UTC text; anything that is not RFC 3339 is kept as is
fn normalize_timestamp(value: &Value) -> Value {
    match value {
        Value::String(text) => match DateTime::parse_from_rfc3339(text) {
            Ok(time) => Value::String(
                time.with_timezone(&Utc)
                    .to_rfc3339_opts(SecondsFormat::Micros, true),
            ),
            Err(_) => value.clone(),
        },
        other => other.clone(),
    }
}
