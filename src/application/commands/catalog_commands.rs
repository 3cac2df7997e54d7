// src/application/commands/catalog_commands.rs
//
// Catalog Command Handlers

use crate::application::{
    dto::CatalogDto,
    error_handling::ToErrorResponse,
    state::AppState,
};
use crate::domain::EnrichedContent;

/// All content, split into movies and web series
pub async fn get_all_content(state: &AppState) -> Result<CatalogDto, String> {
    let content = state.catalog.all_content().await.to_error_response()?;

    Ok(CatalogDto::split(&content))
}

/// Movies and web series featured under `tag`
pub async fn get_content_by_feature(
    tag: String,
    state: &AppState,
) -> Result<Vec<EnrichedContent>, String> {
    let content = state.catalog
        .content_by_feature(&tag)
        .await
        .to_error_response()?;

    Ok(content.as_ref().clone())
}

/// Content tagged with `genre`
pub async fn get_content_by_genre(
    genre: String,
    state: &AppState,
) -> Result<Vec<EnrichedContent>, String> {
    let content = state.catalog
        .content_by_genre(&genre)
        .await
        .to_error_response()?;

    Ok(content.as_ref().clone())
}
