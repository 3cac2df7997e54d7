pub mod entity;

pub use entity::{EpisodeDetail, SeasonDetail, WebSeriesDetail};
