use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::content::entity::null_as_empty;

/// Movie detail, one-to-one with a `Movie` content entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub content_id: Uuid,

    #[serde(default)]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub video_url: Option<String>,

    /// Age rating label ("TV-MA", "PG-13", ...)
    #[serde(default)]
    pub rating_type: Option<String>,

    /// Numeric review score
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub release_year: Option<i32>,

    #[serde(default)]
    pub description: Option<String>,

    /// Rails this movie is featured in ("Home Hero", "Type Popular", ...)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub feature_in: Vec<String>,
}

impl MovieDetail {
    pub fn has_feature(&self, tag: &str) -> bool {
        self.feature_in.iter().any(|f| f == tag)
    }
}
