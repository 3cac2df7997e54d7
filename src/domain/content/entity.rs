use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// One row of `upload_content`: the catalog entry shared by every kind of
/// content. Created by the ingestion side, read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Row identifier
    pub id: Uuid,

    /// Key joined by the kind-specific detail tables
    pub content_id: Uuid,

    pub title: String,

    /// Movie, Web Series, or something this layer does not serve
    pub content_type: ContentKind,

    /// Genre tags ("Comedy", "Action", ...)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genre: Vec<String>,

    #[serde(default)]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Kind of a catalog entry, as stored in `content_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    Movie,
    #[serde(rename = "Web Series")]
    WebSeries,
    /// Any other label written by ingestion (shows, shorts, ...).
    /// Never enriched.
    #[serde(other)]
    Unsupported,
}

impl ContentEntry {
    /// True when any of the entry's genre tags is in `genres`
    pub fn has_any_genre(&self, genres: &[&str]) -> bool {
        self.genre.iter().any(|g| genres.contains(&g.as_str()))
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Movie => write!(f, "Movie"),
            ContentKind::WebSeries => write!(f, "Web Series"),
            ContentKind::Unsupported => write!(f, "Unsupported"),
        }
    }
}

/// Array columns come back as `null` when never written.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_kind_labels() {
        let movie: ContentKind = serde_json::from_value(json!("Movie")).unwrap();
        let series: ContentKind = serde_json::from_value(json!("Web Series")).unwrap();
        let show: ContentKind = serde_json::from_value(json!("Show")).unwrap();

        assert_eq!(movie, ContentKind::Movie);
        assert_eq!(series, ContentKind::WebSeries);
        assert_eq!(show, ContentKind::Unsupported);
        assert_eq!(serde_json::to_value(ContentKind::WebSeries).unwrap(), json!("Web Series"));
    }

    #[test]
    fn test_null_genre_is_empty() {
        let entry: ContentEntry = serde_json::from_value(json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "content_id": "00000000-0000-0000-0000-000000000002",
            "title": "Untagged",
            "content_type": "Movie",
            "genre": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(entry.genre.is_empty());
        assert!(entry.description.is_none());
        assert!(!entry.has_any_genre(&["Drama"]));
    }
}
