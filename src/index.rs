//! Vector index capability traits.
//!
//! Which index/embedding backend is configured varies by deployment, so
//! the pipeline depends only on a capability interface: a backend that
//! can [`build`](IndexBackend::build) an index scoped to a filter, and an
//! index that can [`query`](VectorIndex::query). One implementation per
//! backend; the brute-force in-memory variant lives in
//! [`store::memory`](crate::store::memory).

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ContextFilter, ScoredNode};

/// A query-ready similarity index over some scope of nodes.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Embed `query` internally and return the closest nodes, at most the
    /// bound the index was built with. Callers assume no ordering.
    ///
    /// Embedding-provider failures propagate unchanged.
    async fn query(&self, query: &str) -> Result<Vec<ScoredNode>>;
}

/// Constructs a [`VectorIndex`] scoped to nodes passing a filter.
///
/// A valid filter that matches zero nodes yields an empty index, not an
/// error; [`Error::IndexUnavailable`](crate::error::Error::IndexUnavailable)
/// is reserved for construction failures (backend unreachable, storage
/// errors).
#[async_trait]
pub trait IndexBackend: Send + Sync {
    /// Build an index over nodes passing `filter`, bounded to return at
    /// most `limit` candidates per query.
    async fn build(
        &self,
        filter: Option<&ContextFilter>,
        limit: i64,
    ) -> Result<Box<dyn VectorIndex>>;
}
