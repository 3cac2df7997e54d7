// src/services/content_aggregator.rs
//
// Content Aggregator - joins catalog entries with their kind-specific detail.
//
// CRITICAL RULES:
// - Failing to read upload_content fails the whole aggregation
// - An upload_content row that does not decode drops only that entry
// - Any detail / season / episode failure drops only that item
// - Entries are enriched one at a time, children resolved sequentially
// - Blank tags and genres yield an empty result without touching the backend
// - Entries are never mutated; enrichment builds a new composite

use async_trait::async_trait;

use crate::domain::{
    ContentEntry, ContentKind, EnrichedContent, GenreFilter, MovieDetail, ResolvedSeason,
    ResolvedWebSeries, SeasonDetail, WebSeriesDetail,
};
use crate::error::AppResult;
use crate::repositories::{OrderBy, RowFetcher, SelectQuery, Table};

use super::query_cache::{QueryKey, QueryLoader};
use super::relation_walker::{RelationWalker, EPISODES, SEASONS};

/// How far down a web series is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveDepth {
    /// Seasons only; episode lists are left empty
    Seasons,
    /// Seasons and their episodes
    Episodes,
}

#[derive(Clone)]
pub struct ContentAggregator {
    fetcher: RowFetcher,
    walker: RelationWalker,
}

impl ContentAggregator {
    pub fn new(fetcher: RowFetcher) -> Self {
        let walker = RelationWalker::new(fetcher.clone());
        Self { fetcher, walker }
    }

    /// Every entry, newest update first, fully resolved
    pub async fn fetch_all(&self) -> AppResult<Vec<EnrichedContent>> {
        let query = SelectQuery::from(Table::UploadContent)
            .order_by(OrderBy::desc("updated_at"))
            .order_by(OrderBy::desc("created_at"));
        let entries: Vec<ContentEntry> = self.fetcher.fetch_decodable(&query).await?;

        let enriched = self.enrich_all(entries, ResolveDepth::Episodes).await;
        log::info!("Aggregated {} catalog entries", enriched.len());
        Ok(enriched)
    }

    /// Movies tagged `tag`, and web series with at least one season tagged `tag`
    pub async fn fetch_by_feature(&self, tag: &str) -> AppResult<Vec<EnrichedContent>> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<ContentEntry> = self
            .fetcher
            .fetch_decodable(&SelectQuery::from(Table::UploadContent))
            .await?;

        let featured: Vec<EnrichedContent> = self
            .enrich_all(entries, ResolveDepth::Seasons)
            .await
            .into_iter()
            .filter(|content| content.has_feature(tag))
            .collect();

        log::debug!("{} entries featured as '{}'", featured.len(), tag);
        Ok(featured)
    }

    /// Entries in `genre`; only the matching subset is enriched
    pub async fn fetch_by_genre(&self, genre: &str) -> AppResult<Vec<EnrichedContent>> {
        let Some(filter) = GenreFilter::parse(genre) else {
            return Ok(Vec::new());
        };

        let entries: Vec<ContentEntry> = self
            .fetcher
            .fetch_decodable(&SelectQuery::from(Table::UploadContent))
            .await?;

        let matching: Vec<ContentEntry> = entries
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect();

        let enriched = self.enrich_all(matching, ResolveDepth::Episodes).await;
        log::debug!("{} entries in genre '{}'", enriched.len(), genre.trim());
        Ok(enriched)
    }

    async fn enrich_all(&self, entries: Vec<ContentEntry>, depth: ResolveDepth) -> Vec<EnrichedContent> {
        let mut enriched = Vec::with_capacity(entries.len());
        for entry in entries {
            if let Some(content) = self.enrich(entry, depth).await {
                enriched.push(content);
            }
        }
        enriched
    }

    /// Attach the entry's detail; `None` drops the entry
    pub async fn enrich(&self, entry: ContentEntry, depth: ResolveDepth) -> Option<EnrichedContent> {
        match entry.content_type {
            ContentKind::Movie => {
                let movie = self.movie_detail(&entry).await?;
                Some(EnrichedContent::movie(entry, movie))
            }
            ContentKind::WebSeries => {
                let series = self.web_series(&entry, depth).await?;
                Some(EnrichedContent::web_series(entry, series))
            }
            ContentKind::Unsupported => {
                log::debug!("Dropping '{}': unsupported content type", entry.title);
                None
            }
        }
    }

    async fn movie_detail(&self, entry: &ContentEntry) -> Option<MovieDetail> {
        self.fetcher
            .fetch_single(Table::Movie, "content_id", entry.content_id.to_string())
            .await
            .map_err(|e| log::warn!("Dropping movie '{}': {}", entry.title, e))
            .ok()
    }

    async fn web_series(&self, entry: &ContentEntry, depth: ResolveDepth) -> Option<ResolvedWebSeries> {
        let detail: WebSeriesDetail = self
            .fetcher
            .fetch_single(Table::WebSeries, "content_id", entry.content_id.to_string())
            .await
            .map_err(|e| log::warn!("Dropping web series '{}': {}", entry.title, e))
            .ok()?;

        let seasons: Vec<SeasonDetail> = self.walker.walk(&SEASONS, &detail.season_id_list).await;

        let mut resolved = Vec::with_capacity(seasons.len());
        for season in seasons {
            let episodes = match depth {
                ResolveDepth::Seasons => Vec::new(),
                ResolveDepth::Episodes => self.walker.walk(&EPISODES, &season.episode_id_list).await,
            };
            resolved.push(ResolvedSeason { season, episodes });
        }

        Some(ResolvedWebSeries {
            detail,
            seasons: resolved,
        })
    }
}

#[async_trait]
impl QueryLoader<Vec<EnrichedContent>> for ContentAggregator {
    async fn load(&self, key: &QueryKey) -> AppResult<Vec<EnrichedContent>> {
        match key {
            QueryKey::AllContent => self.fetch_all().await,
            QueryKey::ByFeature(tag) => self.fetch_by_feature(tag).await,
            QueryKey::ByGenre(genre) => self.fetch_by_genre(genre).await,
        }
    }
}
