// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are display-ready representations
// - DTOs are simple, serializable structs
// - Conversion FROM domain values only (never TO)
// - Missing display fields fall back to fixed defaults here, nowhere else

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::domain::{ContentDetail, ContentKind, EnrichedContent, ResolvedSeason};

pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";
pub const NO_DESCRIPTION: &str = "No description available";
pub const DEFAULT_SCORE: &str = "8.0";
pub const HERO_DEFAULT_RATING: &str = "TV-PG";
pub const SERIES_DEFAULT_RATING: &str = "TV-MA";

// ============================================================================
// CATALOG DTOs
// ============================================================================

/// `all_content`, split by kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDto {
    pub movies: Vec<EnrichedContent>,
    pub web_series: Vec<EnrichedContent>,
}

impl CatalogDto {
    pub fn split(content: &[EnrichedContent]) -> Self {
        let (movies, web_series) = content
            .iter()
            .cloned()
            .partition(|c| c.kind() == ContentKind::Movie);
        Self { movies, web_series }
    }
}

// ============================================================================
// PAGE DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroContentDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub rating: String,
    pub year: String,
    pub score: String,
    pub image: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub video_url: String,
}

impl HeroContentDto {
    /// Shown when nothing is featured on the home page
    pub fn welcome() -> Self {
        Self {
            id: "1".to_string(),
            title: "Welcome to StreamVault".to_string(),
            description: "Discover amazing movies, web series, and shows. Upload your content to get started."
                .to_string(),
            rating: HERO_DEFAULT_RATING.to_string(),
            year: "2024".to_string(),
            score: "9.0".to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
            content_type: "Platform".to_string(),
            video_url: String::new(),
        }
    }
}

impl From<&EnrichedContent> for HeroContentDto {
    fn from(content: &EnrichedContent) -> Self {
        let entry = &content.entry;
        let created_year = entry.created_at.year().to_string();

        let (description, rating, year, score, image, video_url) = match &content.detail {
            ContentDetail::Movie(movie) => (
                movie.description.clone(),
                movie.rating_type.clone(),
                movie.release_year.map(|y| y.to_string()),
                movie.rating.map(|r| r.to_string()),
                movie.thumbnail_url.clone(),
                movie.video_url.clone(),
            ),
            ContentDetail::WebSeries(series) => {
                let season = series.first_season();
                (
                    series.detail.description.clone(),
                    None,
                    None,
                    None,
                    season.and_then(|s| s.season.thumbnail_url.clone()),
                    season
                        .and_then(|s| s.first_episode())
                        .and_then(|e| e.video_url.clone()),
                )
            }
        };

        Self {
            id: entry.id.to_string(),
            title: entry.title.clone(),
            description: non_empty(description).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            rating: non_empty(rating).unwrap_or_else(|| HERO_DEFAULT_RATING.to_string()),
            year: year.unwrap_or(created_year),
            score: score.unwrap_or_else(|| DEFAULT_SCORE.to_string()),
            image: non_empty(image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            content_type: entry.content_type.to_string(),
            video_url: video_url.unwrap_or_default(),
        }
    }
}

/// One tile of a rail or the hero slider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCardDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub rating: String,
    pub year: String,
    pub score: String,
    pub image: String,
    #[serde(rename = "type")]
    pub card_type: String,
    /// 1-based
    pub season_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Set on per-season cards
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_content_id: Option<String>,
}

impl ContentCardDto {
    /// Card for `season` (0-based `index`) of a web series
    fn from_season(content: &EnrichedContent, season: Option<&ResolvedSeason>, index: usize) -> Self {
        let entry = &content.entry;
        let series_description = content
            .as_web_series()
            .and_then(|s| s.detail.description.clone());
        let season_detail = season.map(|s| &s.season);

        let description = non_empty(season_detail.and_then(|s| s.season_description.clone()))
            .or_else(|| non_empty(series_description))
            .or_else(|| entry.description.clone())
            .unwrap_or_default();

        Self {
            id: entry.id.to_string(),
            title: entry.title.clone(),
            description,
            rating: non_empty(season_detail.and_then(|s| s.rating_type.clone()))
                .unwrap_or_else(|| SERIES_DEFAULT_RATING.to_string()),
            year: season_detail
                .and_then(|s| s.release_year)
                .map(|y| y.to_string())
                .unwrap_or_else(|| entry.created_at.year().to_string()),
            score: season_detail
                .and_then(|s| s.rating)
                .map(|r| r.to_string())
                .unwrap_or_else(|| DEFAULT_SCORE.to_string()),
            image: season_detail
                .and_then(|s| s.thumbnail_url.clone())
                .unwrap_or_default(),
            card_type: "series".to_string(),
            season_number: index as u32 + 1,
            video_url: None,
            original_content_id: None,
        }
    }

    /// Hero slider card, built from the first season
    pub fn hero_slide(content: &EnrichedContent) -> Self {
        let first = content.as_web_series().and_then(|s| s.first_season());
        Self {
            video_url: first
                .and_then(|s| s.first_episode())
                .and_then(|e| e.video_url.clone()),
            ..Self::from_season(content, first, 0)
        }
    }

    /// Genre rail card, built from the first season and keyed by content id
    pub fn genre_tile(content: &EnrichedContent) -> Self {
        let first = content.as_web_series().and_then(|s| s.first_season());
        Self {
            id: content.entry.content_id.to_string(),
            card_type: "webseries".to_string(),
            ..Self::from_season(content, first, 0)
        }
    }

    /// Feature rail card for one season
    pub fn season_tile(content: &EnrichedContent, season: &ResolvedSeason, index: usize) -> Self {
        let card = Self::from_season(content, Some(season), index);
        Self {
            id: format!("{}-season-{}", content.entry.id, card.season_number),
            original_content_id: Some(content.entry.id.to_string()),
            ..card
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDto {
    pub title: String,
    pub contents: Vec<ContentCardDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSeriesPageDto {
    pub hero: Vec<ContentCardDto>,
    pub sections: Vec<SectionDto>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
