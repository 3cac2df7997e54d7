// src/domain/mod.rs
//
// Domain Root - catalog records as stored by the backend, plus the
// enriched composite assembled from them.
//
// All other modules import from `crate::domain::*`

pub mod content;
pub mod enriched;
pub mod movie;
pub mod series;

// Catalog entry
pub use content::{ContentEntry, ContentKind, GenreFilter, ACTION_AND_ADVENTURE};

// Kind-specific details
pub use movie::MovieDetail;
pub use series::{EpisodeDetail, SeasonDetail, WebSeriesDetail};

// Composite
pub use enriched::{ContentDetail, EnrichedContent, ResolvedSeason, ResolvedWebSeries};

/// Feature tag of the home page hero banner
pub const HOME_HERO: &str = "Home Hero";

/// Feature tag of the "New Release" rail
pub const TYPE_NEW_RELEASE: &str = "Type New Release";

/// Feature tag of the "Popular" rail
pub const TYPE_POPULAR: &str = "Type Popular";
