// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Row fetches and relation walks are composed into enriched content here,
// and the results are cached per query key.

pub mod catalog_queries;
pub mod content_aggregator;
pub mod query_cache;
pub mod relation_walker;
pub mod retry;

#[cfg(test)]
mod query_cache_tests;

pub use catalog_queries::{CatalogQueries, ContentList};

pub use content_aggregator::{ContentAggregator, ResolveDepth};

pub use query_cache::{
    CachePolicies,
    QueryCache,
    QueryKey,
    QueryLoader,
    QueryPolicy,
    QueryWatch,
};

pub use relation_walker::{Relation, RelationWalker, EPISODES, SEASONS};

pub use retry::RetryPolicy;
