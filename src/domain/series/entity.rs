use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::content::entity::null_as_empty;

/// Web series detail, one-to-one with a `Web Series` content entry.
/// Seasons are referenced by id, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSeriesDetail {
    pub content_id: Uuid,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub season_id_list: Vec<Uuid>,

    #[serde(default)]
    pub description: Option<String>,
}

/// One season of a web series. Carries the display metadata the rails use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDetail {
    pub season_id: Uuid,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub episode_id_list: Vec<Uuid>,

    #[serde(default)]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub rating_type: Option<String>,

    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub release_year: Option<i32>,

    #[serde(default)]
    pub season_description: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub feature_in: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDetail {
    pub episode_id: Uuid,

    #[serde(default)]
    pub video_url: Option<String>,

    #[serde(default)]
    pub episode_number: Option<i32>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SeasonDetail {
    pub fn has_feature(&self, tag: &str) -> bool {
        self.feature_in.iter().any(|f| f == tag)
    }
}
