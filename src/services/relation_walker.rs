// src/services/relation_walker.rs
//
// Relation Walker - resolves a foreign-key id list into child records.
//
// RULES:
// - One lookup per id, strictly one at a time
// - Output keeps the id list's order
// - An id that fails to resolve is logged and skipped, never raised

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::repositories::{RowFetcher, Table};

/// A foreign-key list field and the table/column its ids point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Name of the id list field on the parent
    pub field: &'static str,
    pub table: Table,
    pub key_column: &'static str,
}

/// web_series.season_id_list → season.season_id
pub const SEASONS: Relation = Relation {
    field: "season_id_list",
    table: Table::Season,
    key_column: "season_id",
};

/// season.episode_id_list → episode.episode_id
pub const EPISODES: Relation = Relation {
    field: "episode_id_list",
    table: Table::Episode,
    key_column: "episode_id",
};

#[derive(Clone)]
pub struct RelationWalker {
    fetcher: RowFetcher,
}

impl RelationWalker {
    pub fn new(fetcher: RowFetcher) -> Self {
        Self { fetcher }
    }

    /// Resolve every id of `ids` through `relation`
    pub async fn walk<T: DeserializeOwned>(&self, relation: &Relation, ids: &[Uuid]) -> Vec<T> {
        let mut resolved = Vec::with_capacity(ids.len());

        for id in ids {
            if let Some(child) = self.resolve_one(relation, *id).await {
                resolved.push(child);
            }
        }

        if resolved.len() < ids.len() {
            log::debug!(
                "{}: resolved {} of {} ids",
                relation.field,
                resolved.len(),
                ids.len()
            );
        }

        resolved
    }

    async fn resolve_one<T: DeserializeOwned>(&self, relation: &Relation, id: Uuid) -> Option<T> {
        match self
            .fetcher
            .fetch_single(relation.table, relation.key_column, id.to_string())
            .await
        {
            Ok(child) => Some(child),
            Err(e) => {
                log::warn!("Skipping {} {} from {}: {}", relation.table, id, relation.field, e);
                None
            }
        }
    }
}
