// src/testing.rs
//
// Shared test fixtures: a small catalog builder and a backend wrapper that
// records every query and can fail chosen lookups.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::repositories::{CatalogBackend, CatalogSnapshot, MemoryBackend, Row, SelectQuery, Table};

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// `2024-01-DD T00:00:00Z`, so day numbers order the timestamps
pub fn day(d: u32) -> String {
    format!("2024-01-{:02}T00:00:00Z", d)
}

#[derive(Default)]
pub struct CatalogBuilder {
    snapshot: CatalogSnapshot,
    next_id: u128,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self { snapshot: CatalogSnapshot::default(), next_id: 1000 }
    }

    fn fresh_id(&mut self) -> Uuid {
        self.next_id += 1;
        id(self.next_id)
    }

    /// Content entry only, no detail row
    pub fn entry(&mut self, content_id: Uuid, title: &str, kind: &str, genres: &[&str], updated: u32, created: u32) -> &mut Self {
        let row_id = self.fresh_id();
        self.snapshot
            .push(
                Table::UploadContent,
                json!({
                    "id": row_id.to_string(),
                    "content_id": content_id.to_string(),
                    "title": title,
                    "content_type": kind,
                    "genre": genres,
                    "description": format!("About {}", title),
                    "created_at": day(created),
                    "updated_at": day(updated),
                }),
            )
            .expect("fixture row is an object");
        self
    }

    pub fn movie_detail(&mut self, content_id: Uuid, features: &[&str]) -> &mut Self {
        self.snapshot
            .push(
                Table::Movie,
                json!({
                    "content_id": content_id.to_string(),
                    "thumbnail_url": format!("https://cdn.example/{}.jpg", content_id),
                    "video_url": format!("https://cdn.example/{}.mp4", content_id),
                    "rating_type": "PG-13",
                    "rating": 7.8,
                    "release_year": 2023,
                    "description": "Movie detail",
                    "feature_in": features,
                }),
            )
            .expect("fixture row is an object");
        self
    }

    /// Entry plus movie detail
    pub fn movie(&mut self, content_id: Uuid, title: &str, genres: &[&str], features: &[&str], updated: u32, created: u32) -> &mut Self {
        self.entry(content_id, title, "Movie", genres, updated, created);
        self.movie_detail(content_id, features)
    }

    pub fn series_detail(&mut self, content_id: Uuid, seasons: &[Uuid]) -> &mut Self {
        let seasons: Vec<String> = seasons.iter().map(|s| s.to_string()).collect();
        self.snapshot
            .push(
                Table::WebSeries,
                json!({
                    "content_id": content_id.to_string(),
                    "season_id_list": seasons,
                    "description": "Series detail",
                }),
            )
            .expect("fixture row is an object");
        self
    }

    /// Entry plus web series detail
    pub fn series(&mut self, content_id: Uuid, title: &str, genres: &[&str], seasons: &[Uuid], updated: u32, created: u32) -> &mut Self {
        self.entry(content_id, title, "Web Series", genres, updated, created);
        self.series_detail(content_id, seasons)
    }

    pub fn season(&mut self, season_id: Uuid, episodes: &[Uuid], features: &[&str]) -> &mut Self {
        let episodes: Vec<String> = episodes.iter().map(|e| e.to_string()).collect();
        self.snapshot
            .push(
                Table::Season,
                json!({
                    "season_id": season_id.to_string(),
                    "episode_id_list": episodes,
                    "thumbnail_url": format!("https://cdn.example/{}.jpg", season_id),
                    "rating_type": "TV-14",
                    "rating": 8.4,
                    "release_year": 2022,
                    "season_description": format!("Season {}", season_id.as_u128()),
                    "feature_in": features,
                }),
            )
            .expect("fixture row is an object");
        self
    }

    pub fn episode(&mut self, episode_id: Uuid, number: i32) -> &mut Self {
        self.snapshot
            .push(
                Table::Episode,
                json!({
                    "episode_id": episode_id.to_string(),
                    "video_url": format!("https://cdn.example/{}.mp4", episode_id),
                    "episode_number": number,
                    "created_at": day(1),
                }),
            )
            .expect("fixture row is an object");
        self
    }

    /// Arbitrary row, for shapes the helpers above never produce
    pub fn row(&mut self, table: Table, value: Value) -> &mut Self {
        self.snapshot.push(table, value).expect("fixture row is an object");
        self
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot.clone()
    }

    pub fn backend(&self) -> Arc<RecordingBackend> {
        Arc::new(RecordingBackend::new(MemoryBackend::new(self.snapshot())))
    }
}

/// Wraps a MemoryBackend: logs queries, fails chosen (table, value) lookups
/// or whole tables, and can hold each call for a while.
pub struct RecordingBackend {
    inner: MemoryBackend,
    queries: Mutex<Vec<SelectQuery>>,
    failing_lookups: Mutex<HashSet<(Table, String)>>,
    failing_tables: Mutex<HashSet<Table>>,
    delay: Mutex<Option<Duration>>,
}

impl RecordingBackend {
    pub fn new(inner: MemoryBackend) -> Self {
        Self {
            inner,
            queries: Mutex::new(Vec::new()),
            failing_lookups: Mutex::new(HashSet::new()),
            failing_tables: Mutex::new(HashSet::new()),
            delay: Mutex::new(None),
        }
    }

    pub fn fail_lookup(&self, table: Table, value: Uuid) {
        self.failing_lookups.lock().unwrap().insert((table, value.to_string()));
    }

    pub fn fail_table(&self, table: Table) {
        self.failing_tables.lock().unwrap().insert(table);
    }

    pub fn heal(&self) {
        self.failing_lookups.lock().unwrap().clear();
        self.failing_tables.lock().unwrap().clear();
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn count(&self, table: Table) -> usize {
        self.queries.lock().unwrap().iter().filter(|q| q.table == table).count()
    }

    pub fn total(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogBackend for RecordingBackend {
    async fn select(&self, query: &SelectQuery) -> AppResult<Vec<Row>> {
        self.queries.lock().unwrap().push(query.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_tables.lock().unwrap().contains(&query.table) {
            return Err(AppError::Backend { status: 503, message: format!("{} unavailable", query.table) });
        }

        if let Some(filter) = &query.filter {
            let value = match &filter.value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if self.failing_lookups.lock().unwrap().contains(&(query.table, value)) {
                return Err(AppError::Backend { status: 500, message: "lookup failed".to_string() });
            }
        }

        self.inner.select(query).await
    }
}
