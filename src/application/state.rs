// src/application/state.rs

use std::sync::Arc;

use crate::services::CatalogQueries;

/// Application state shared by every command.
/// Built once by `app::init_app_state`.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogQueries>,
}
