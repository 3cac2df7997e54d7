// src/application/commands/page_commands.rs
//
// Page Command Handlers
//
// RULES:
// - Load through the catalog queries only
// - Shaping lives in application::pages
// - A failed genre rail renders empty; a failed all-content load fails the page

use std::sync::Arc;
use tokio::task::JoinSet;

use crate::application::{
    dto::{HeroContentDto, SectionDto, WebSeriesPageDto},
    error_handling::ToErrorResponse,
    pages,
    state::AppState,
};
use crate::services::CatalogQueries;

/// Hero banner of the home page
pub async fn get_home_hero(state: &AppState) -> Result<HeroContentDto, String> {
    let content = state.catalog.all_content().await.to_error_response()?;

    Ok(pages::home_hero(&content))
}

/// Hero slider, feature rails and genre rails of the web series page
pub async fn get_web_series_page(state: &AppState) -> Result<WebSeriesPageDto, String> {
    let all = state.catalog.all_content().await.to_error_response()?;

    let mut sections: Vec<SectionDto> = pages::FEATURE_RAILS
        .iter()
        .map(|(title, tag)| pages::feature_rail(title, &all, tag))
        .collect();
    sections.extend(load_genre_rails(&state.catalog).await);

    Ok(WebSeriesPageDto {
        hero: pages::hero_slider(&all),
        sections,
    })
}

/// Genre rails, loaded concurrently and returned in rail order
async fn load_genre_rails(catalog: &Arc<CatalogQueries>) -> Vec<SectionDto> {
    let mut tasks = JoinSet::new();
    for (index, genre) in pages::GENRE_RAILS.into_iter().enumerate() {
        let catalog = Arc::clone(catalog);
        tasks.spawn(async move { (index, catalog.content_by_genre(genre).await) });
    }

    let mut rails: Vec<Option<SectionDto>> = vec![None; pages::GENRE_RAILS.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(content))) => {
                rails[index] = Some(pages::genre_rail(pages::GENRE_RAILS[index], &content));
            }
            Ok((index, Err(e))) => {
                log::warn!("Genre rail '{}' failed: {}", pages::GENRE_RAILS[index], e);
            }
            Err(e) => log::error!("Genre rail task failed: {}", e),
        }
    }

    rails
        .into_iter()
        .zip(pages::GENRE_RAILS)
        .map(|(rail, title)| {
            rail.unwrap_or_else(|| SectionDto {
                title: title.to_string(),
                contents: Vec::new(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{app_state_for, AppConfig, BackendConfig};
    use crate::domain::{TYPE_NEW_RELEASE, TYPE_POPULAR};
    use crate::repositories::Table;
    use crate::services::{CachePolicies, RetryPolicy};
    use crate::testing::{id, CatalogBuilder, RecordingBackend};

    fn state_with(backend: Arc<RecordingBackend>, cache: CachePolicies) -> AppState {
        let config = AppConfig {
            backend: BackendConfig::Memory { snapshot: "catalog.json".into() },
            cache,
        };
        app_state_for(backend, &config)
    }

    fn state(backend: Arc<RecordingBackend>) -> AppState {
        state_with(backend, CachePolicies::default())
    }

    #[tokio::test]
    async fn test_web_series_page_layout() {
        let (s1, s2, s3) = (id(11), id(12), id(13));
        let mut catalog = CatalogBuilder::new();
        catalog
            .series(id(1), "Crime Show", &["Crime"], &[s1, s2], 1, 1)
            .season(s1, &[], &[TYPE_POPULAR])
            .season(s2, &[], &[TYPE_NEW_RELEASE])
            .series(id(2), "Action Show", &["Action"], &[s3], 2, 2)
            .season(s3, &[], &[TYPE_POPULAR])
            .movie(id(3), "Action Film", &["Action"], &[TYPE_POPULAR], 3, 3);
        let backend = catalog.backend();

        let page = get_web_series_page(&state(backend)).await.unwrap();

        let titles: Vec<&str> = page.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "New Release", "Popular", "Action & Adventure", "Comedy", "Crime", "Drama",
                "Horror", "Family", "Thriller", "Sci-Fi"
            ]
        );
        assert_eq!(page.hero.len(), 2);
        assert_eq!(page.hero[0].title, "Action Show");
        assert_eq!(page.sections[0].contents.len(), 1);
        assert_eq!(page.sections[1].contents.len(), 2);
        assert_eq!(page.sections[2].contents.len(), 1);
        assert_eq!(page.sections[2].contents[0].title, "Action Show");
        assert_eq!(page.sections[4].contents[0].title, "Crime Show");
        assert!(page.sections[3].contents.is_empty());
    }

    #[tokio::test]
    async fn test_web_series_page_fails_without_catalog() {
        let backend = CatalogBuilder::new().backend();
        backend.fail_table(Table::UploadContent);
        let mut cache = CachePolicies::default();
        cache.all_content.retry = RetryPolicy::none();

        let err = get_web_series_page(&state_with(backend, cache)).await.unwrap_err();

        assert!(err.contains("\"backend\""));
    }

    #[tokio::test]
    async fn test_home_hero_uses_featured_content() {
        let mut catalog = CatalogBuilder::new();
        catalog
            .movie(id(1), "Hero Film", &[], &["Home Hero"], 1, 4)
            .movie(id(2), "Plain Film", &[], &[], 1, 9);
        let backend = catalog.backend();

        let hero = get_home_hero(&state(backend)).await.unwrap();

        assert_eq!(hero.title, "Hero Film");
        assert_eq!(hero.rating, "PG-13");
        assert_eq!(hero.year, "2023");
    }
}
