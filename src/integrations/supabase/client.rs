// src/integrations/supabase/client.rs
//
// Hosted catalog backend - PostgREST over HTTP
//
// ARCHITECTURE:
// - Implements CatalogBackend against the hosted project's REST endpoint
// - GET {base}/rest/v1/{table}?select=*&{column}=eq.{value}&order=...
// - Anonymous key sent both as `apikey` and as bearer token
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Returns untyped rows; RowFetcher does the typing
// - Non-2xx responses become AppError::Backend with the body as message

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::repositories::{CatalogBackend, Row, SelectQuery};

pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl SupabaseClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http_client,
        })
    }

    fn table_url(&self, query: &SelectQuery) -> String {
        format!("{}/rest/v1/{}", self.base_url, query.table.as_str())
    }

    /// Query string pairs for a select, in PostgREST syntax
    fn query_params(query: &SelectQuery) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];

        if let Some(filter) = &query.filter {
            let condition = match &filter.value {
                Value::Null => "is.null".to_string(),
                Value::String(s) => format!("eq.{}", s),
                other => format!("eq.{}", other),
            };
            params.push((filter.column.clone(), condition));
        }

        if !query.order.is_empty() {
            let order = query
                .order
                .iter()
                .map(|o| {
                    if o.descending {
                        format!("{}.desc", o.column)
                    } else {
                        format!("{}.asc", o.column)
                    }
                })
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }

        params
    }
}

#[async_trait]
impl CatalogBackend for SupabaseClient {
    async fn select(&self, query: &SelectQuery) -> AppResult<Vec<Row>> {
        query.validate()?;

        let response = self
            .http_client
            .get(self.table_url(query))
            .query(&Self::query_params(query))
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AppError::Backend {
                status: status.as_u16(),
                message: body,
            });
        }

        let rows: Vec<Row> = serde_json::from_str(&body)?;
        log::debug!("{} returned {} rows", query.table, rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{OrderBy, Table};

    #[test]
    fn test_base_url_is_normalized() {
        let client = SupabaseClient::new("https://demo.supabase.co/", "anon", Duration::from_secs(5)).unwrap();
        let query = SelectQuery::from(Table::WebSeries);

        assert_eq!(client.table_url(&query), "https://demo.supabase.co/rest/v1/web_series");
    }

    #[test]
    fn test_equality_and_order_params() {
        let query = SelectQuery::from(Table::UploadContent)
            .eq("content_type", "Movie")
            .order_by(OrderBy::desc("updated_at"))
            .order_by(OrderBy::desc("created_at"));

        let params = SupabaseClient::query_params(&query);

        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("content_type".to_string(), "eq.Movie".to_string()),
                ("order".to_string(), "updated_at.desc,created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_numeric_and_null_filters() {
        let numeric = SupabaseClient::query_params(&SelectQuery::from(Table::Episode).eq("episode_number", 3));
        let null = SupabaseClient::query_params(&SelectQuery::from(Table::Episode).eq("video_url", Value::Null));

        assert_eq!(numeric[1], ("episode_number".to_string(), "eq.3".to_string()));
        assert_eq!(null[1], ("video_url".to_string(), "is.null".to_string()));
    }
}
