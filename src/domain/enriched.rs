// src/domain/enriched.rs
//
// Enriched content - a catalog entry with its resolved detail attached.
//
// The entry's own fields are never touched; the detail sits beside them
// under a kind-specific key ("movie" or "web_series"), which is also the
// JSON shape handed to consumers.

use serde::{Deserialize, Serialize};

use super::content::{ContentEntry, ContentKind};
use super::movie::MovieDetail;
use super::series::{EpisodeDetail, SeasonDetail, WebSeriesDetail};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedContent {
    #[serde(flatten)]
    pub entry: ContentEntry,

    #[serde(flatten)]
    pub detail: ContentDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentDetail {
    #[serde(rename = "movie")]
    Movie(MovieDetail),

    #[serde(rename = "web_series")]
    WebSeries(ResolvedWebSeries),
}

/// Web series detail with the seasons that resolved, in list order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedWebSeries {
    #[serde(flatten)]
    pub detail: WebSeriesDetail,

    pub seasons: Vec<ResolvedSeason>,
}

/// Season with the episodes that resolved, in list order.
/// Left empty when the aggregation stopped at season depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSeason {
    #[serde(flatten)]
    pub season: SeasonDetail,

    #[serde(default)]
    pub episodes: Vec<EpisodeDetail>,
}

impl EnrichedContent {
    pub fn movie(entry: ContentEntry, movie: MovieDetail) -> Self {
        Self {
            entry,
            detail: ContentDetail::Movie(movie),
        }
    }

    pub fn web_series(entry: ContentEntry, series: ResolvedWebSeries) -> Self {
        Self {
            entry,
            detail: ContentDetail::WebSeries(series),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self.detail {
            ContentDetail::Movie(_) => ContentKind::Movie,
            ContentDetail::WebSeries(_) => ContentKind::WebSeries,
        }
    }

    pub fn as_movie(&self) -> Option<&MovieDetail> {
        match &self.detail {
            ContentDetail::Movie(movie) => Some(movie),
            ContentDetail::WebSeries(_) => None,
        }
    }

    pub fn as_web_series(&self) -> Option<&ResolvedWebSeries> {
        match &self.detail {
            ContentDetail::WebSeries(series) => Some(series),
            ContentDetail::Movie(_) => None,
        }
    }

    /// Movies carry feature tags on the detail, web series on each season;
    /// a series is featured when any resolved season is.
    pub fn has_feature(&self, tag: &str) -> bool {
        match &self.detail {
            ContentDetail::Movie(movie) => movie.has_feature(tag),
            ContentDetail::WebSeries(series) => series.seasons.iter().any(|s| s.season.has_feature(tag)),
        }
    }
}

impl ResolvedWebSeries {
    pub fn first_season(&self) -> Option<&ResolvedSeason> {
        self.seasons.first()
    }
}

impl ResolvedSeason {
    pub fn first_episode(&self) -> Option<&EpisodeDetail> {
        self.episodes.first()
    }
}
