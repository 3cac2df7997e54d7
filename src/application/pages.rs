// src/application/pages.rs
//
// Page shaping - picks and orders enriched content for the home hero and
// the web series page. Display-only: nothing here loads data.

use crate::domain::{ContentKind, EnrichedContent, HOME_HERO, TYPE_NEW_RELEASE, TYPE_POPULAR};

use super::dto::{ContentCardDto, HeroContentDto, SectionDto};

/// Slides in the web series hero slider
pub const HERO_SLIDES: usize = 5;

/// Genre rails of the web series page, in display order
pub const GENRE_RAILS: [&str; 8] = [
    "Action & Adventure",
    "Comedy",
    "Crime",
    "Drama",
    "Horror",
    "Family",
    "Thriller",
    "Sci-Fi",
];

/// Feature rails of the web series page: (title, tag)
pub const FEATURE_RAILS: [(&str, &str); 2] = [("New Release", TYPE_NEW_RELEASE), ("Popular", TYPE_POPULAR)];

/// Web series only, newest `created_at` first; ties keep input order
fn newest_web_series(content: &[EnrichedContent]) -> Vec<&EnrichedContent> {
    let mut series: Vec<&EnrichedContent> = content
        .iter()
        .filter(|c| c.kind() == ContentKind::WebSeries)
        .collect();
    series.sort_by(|a, b| b.entry.created_at.cmp(&a.entry.created_at));
    series
}

/// Newest content featured as "Home Hero", or the welcome card
pub fn home_hero(all: &[EnrichedContent]) -> HeroContentDto {
    let mut featured: Vec<&EnrichedContent> = all.iter().filter(|c| c.has_feature(HOME_HERO)).collect();
    featured.sort_by(|a, b| b.entry.created_at.cmp(&a.entry.created_at));

    match featured.first() {
        Some(content) => HeroContentDto::from(*content),
        None => {
            log::debug!("No content featured as '{}', using welcome card", HOME_HERO);
            HeroContentDto::welcome()
        }
    }
}

pub fn hero_slider(all: &[EnrichedContent]) -> Vec<ContentCardDto> {
    newest_web_series(all)
        .into_iter()
        .take(HERO_SLIDES)
        .map(ContentCardDto::hero_slide)
        .collect()
}

/// One card per season tagged `tag`, across all web series
pub fn feature_rail(title: &str, all: &[EnrichedContent], tag: &str) -> SectionDto {
    let contents = all
        .iter()
        .filter_map(|c| c.as_web_series().map(|series| (c, series)))
        .flat_map(|(content, series)| {
            series
                .seasons
                .iter()
                .enumerate()
                .filter(|(_, season)| season.season.has_feature(tag))
                .map(move |(index, season)| ContentCardDto::season_tile(content, season, index))
        })
        .collect();

    SectionDto {
        title: title.to_string(),
        contents,
    }
}

/// Web series of a genre query, newest first
pub fn genre_rail(title: &str, genre_content: &[EnrichedContent]) -> SectionDto {
    SectionDto {
        title: title.to_string(),
        contents: newest_web_series(genre_content)
            .into_iter()
            .map(ContentCardDto::genre_tile)
            .collect(),
    }
}
