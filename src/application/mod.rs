// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Boundary between consumers (CLI) and the catalog services
// - Commands load through CatalogQueries, pages shape, DTOs serialize
// - Errors leave this layer as serialized ErrorResponse values

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod pages;
pub mod state;

pub use commands::*;
pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::AppState;
