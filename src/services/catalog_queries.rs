// src/services/catalog_queries.rs
//
// Catalog Queries - the cached read surface consumers call.
//
// Each query routes through the QueryCache to the ContentAggregator.
// Tags and genres are trimmed before they become cache keys; a blank one
// is answered with an empty list and never cached.

use std::sync::Arc;

use super::content_aggregator::ContentAggregator;
use super::query_cache::{CachePolicies, QueryCache, QueryKey, QueryWatch};
use crate::domain::EnrichedContent;
use crate::error::AppResult;
use crate::repositories::{CatalogBackend, RowFetcher};

pub type ContentList = Arc<Vec<EnrichedContent>>;

pub struct CatalogQueries {
    cache: Arc<QueryCache<Vec<EnrichedContent>>>,
}

impl CatalogQueries {
    pub fn new(backend: Arc<dyn CatalogBackend>, policies: CachePolicies) -> Self {
        let aggregator = ContentAggregator::new(RowFetcher::new(backend));
        Self {
            cache: Arc::new(QueryCache::new(Arc::new(aggregator), policies)),
        }
    }

    pub async fn all_content(&self) -> AppResult<ContentList> {
        self.cache.get(&QueryKey::AllContent).await
    }

    pub async fn content_by_feature(&self, tag: &str) -> AppResult<ContentList> {
        match feature_key(tag) {
            Some(key) => self.cache.get(&key).await,
            None => Ok(Arc::new(Vec::new())),
        }
    }

    pub async fn content_by_genre(&self, genre: &str) -> AppResult<ContentList> {
        match genre_key(genre) {
            Some(key) => self.cache.get(&key).await,
            None => Ok(Arc::new(Vec::new())),
        }
    }

    /// Keep `all_content` refreshed on its refetch interval
    pub fn watch_all_content(&self) -> QueryWatch {
        self.cache.watch(QueryKey::AllContent)
    }

    pub fn watch_feature(&self, tag: &str) -> Option<QueryWatch> {
        feature_key(tag).map(|key| self.cache.watch(key))
    }

    pub fn watch_genre(&self, genre: &str) -> Option<QueryWatch> {
        genre_key(genre).map(|key| self.cache.watch(key))
    }

    pub fn invalidate_all_content(&self) {
        self.cache.invalidate(&QueryKey::AllContent);
    }

    pub fn evict_idle(&self) -> usize {
        self.cache.evict_idle()
    }
}

fn feature_key(tag: &str) -> Option<QueryKey> {
    let tag = tag.trim();
    (!tag.is_empty()).then(|| QueryKey::ByFeature(tag.to_string()))
}

fn genre_key(genre: &str) -> Option<QueryKey> {
    let genre = genre.trim();
    (!genre.is_empty()).then(|| QueryKey::ByGenre(genre.to_string()))
}
