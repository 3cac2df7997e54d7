// src/repositories/catalog_backend.rs
//
// Backend query capability
//
// CRITICAL RULES:
// - Backends are DUMB row sources
// - select-all-columns by table, one equality filter, ordered keys
// - NO joins, NO business logic
// - Rows come back as generic JSON objects; typing happens in RowFetcher

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::OnceLock;

use crate::error::{AppError, AppResult};

/// A backend row: column name → value
pub type Row = serde_json::Map<String, Value>;

/// Catalog tables reachable through a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    UploadContent,
    Movie,
    WebSeries,
    Season,
    Episode,
}

impl Table {
    pub const ALL: [Table; 5] = [
        Table::UploadContent,
        Table::Movie,
        Table::WebSeries,
        Table::Season,
        Table::Episode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::UploadContent => "upload_content",
            Table::Movie => "movie",
            Table::WebSeries => "web_series",
            Table::Season => "season",
            Table::Episode => "episode",
        }
    }

    pub fn from_name(name: &str) -> Option<Table> {
        Table::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Equality predicate `column = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(column: &str) -> Self {
        Self { column: column.to_string(), descending: false }
    }

    pub fn desc(column: &str) -> Self {
        Self { column: column.to_string(), descending: true }
    }
}

/// `SELECT * FROM table [WHERE column = value] [ORDER BY ...]`
///
/// Order keys apply in sequence: later keys only break ties of earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: Table,
    pub filter: Option<Filter>,
    pub order: Vec<OrderBy>,
}

impl SelectQuery {
    pub fn from(table: Table) -> Self {
        Self { table, filter: None, order: Vec::new() }
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter { column: column.to_string(), value: value.into() });
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    /// Every column name the query mentions, for validation
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.filter
            .iter()
            .map(|f| f.column.as_str())
            .chain(self.order.iter().map(|o| o.column.as_str()))
    }

    pub fn validate(&self) -> AppResult<()> {
        for column in self.columns() {
            validate_column(column)?;
        }
        Ok(())
    }
}

/// Generic relational read interface over the catalog store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// One round trip; returns every matching row in the requested order
    async fn select(&self, query: &SelectQuery) -> AppResult<Vec<Row>>;
}

fn column_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("column pattern is valid"))
}

/// Column names are spliced into SQL and URLs, so only plain
/// snake_case identifiers are accepted.
pub fn validate_column(column: &str) -> AppResult<()> {
    if column_pattern().is_match(column) {
        Ok(())
    } else {
        Err(AppError::InvalidQuery(format!("Invalid column name '{}'", column)))
    }
}

/// Compare two rows by `order`, with relational NULL placement:
/// nulls sort after values ascending and before values descending.
pub fn compare_rows(a: &Row, b: &Row, order: &[OrderBy]) -> Ordering {
    for key in order {
        let left = a.get(&key.column).unwrap_or(&Value::Null);
        let right = b.get(&key.column).unwrap_or(&Value::Null);
        let ordering = compare_values(left, right);
        let ordering = if key.descending { ordering.reverse() } else { ordering };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        // timestamps by instant, ranked before any other text
        (Value::String(x), Value::String(y)) => match (parse_timestamp(x), parse_timestamp(y)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => x.cmp(y),
        },
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// RFC 3339 text as an instant, whatever its offset or precision
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text).ok().map(|t| t.with_timezone(&Utc))
}
