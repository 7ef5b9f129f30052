//! Retrieval pipeline orchestration.
//!
//! [`RetrievalService`] wires the stages together: index construction,
//! candidate retrieval, ranking, and window expansion. Each stage is also
//! callable on its own, so callers and tests can exercise the pipeline
//! step by step.
//!
//! Collaborators are injected at construction; the service holds no other
//! state, so one instance serves concurrent requests without locking.

use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::index::{IndexBackend, VectorIndex};
use crate::models::{Chunk, ContextFilter, ScoredNode};
use crate::rank;
use crate::store::NodeStore;
use crate::window;

/// Default candidate limit when the caller does not specify one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Default window radius: no sibling context around a hit.
pub const DEFAULT_WINDOW_RADIUS: i64 = 0;

/// Tuning parameters for one retrieval request.
///
/// Validated once at service entry: a non-positive `limit` or a negative
/// `window_radius` is rejected with
/// [`Error::InvalidArgument`] before any external call.
#[derive(Debug, Clone)]
pub struct RetrievalParams {
    /// Maximum candidates fetched from the index. Must be positive.
    pub limit: i64,
    /// Sibling nodes included on each side of a hit. Must be >= 0.
    pub window_radius: i64,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            window_radius: DEFAULT_WINDOW_RADIUS,
        }
    }
}

impl RetrievalParams {
    fn validate(&self) -> Result<()> {
        if self.limit <= 0 {
            return Err(Error::InvalidArgument(format!(
                "limit must be positive, got {}",
                self.limit
            )));
        }
        if self.window_radius < 0 {
            return Err(Error::InvalidArgument(format!(
                "window_radius must be non-negative, got {}",
                self.window_radius
            )));
        }
        Ok(())
    }
}

/// End-to-end chunk retrieval over injected collaborators.
pub struct RetrievalService {
    store: Arc<dyn NodeStore>,
    backend: Arc<dyn IndexBackend>,
}

impl RetrievalService {
    pub fn new(store: Arc<dyn NodeStore>, backend: Arc<dyn IndexBackend>) -> Self {
        Self { store, backend }
    }

    /// Stage 1: build a query-scoped index over nodes passing `filter`.
    ///
    /// A filter matching zero nodes yields an empty index; construction
    /// failures surface as
    /// [`Error::IndexUnavailable`].
    pub async fn build_index(
        &self,
        filter: Option<&ContextFilter>,
        limit: i64,
    ) -> Result<Box<dyn VectorIndex>> {
        self.backend.build(filter, limit).await
    }

    /// Stage 2: fetch similarity candidates for `query`.
    ///
    /// The index bounds its own output, but the limit is enforced here
    /// too so foreign backends cannot overrun it. No ordering is assumed.
    pub async fn retrieve_candidates(
        &self,
        index: &dyn VectorIndex,
        query: &str,
        limit: i64,
    ) -> Result<Vec<ScoredNode>> {
        if limit <= 0 {
            return Err(Error::InvalidArgument(format!(
                "limit must be positive, got {limit}"
            )));
        }
        let mut candidates = index.query(query).await?;
        candidates.truncate(limit as usize);
        Ok(candidates)
    }

    /// Stage 4: expand ranked hits into merged context windows.
    ///
    /// Stage 3 is [`rank::rank`], pure and callable directly.
    pub async fn expand(&self, ranked: &[ScoredNode], window_radius: i64) -> Result<Vec<Chunk>> {
        if window_radius < 0 {
            return Err(Error::InvalidArgument(format!(
                "window_radius must be non-negative, got {window_radius}"
            )));
        }
        window::expand(self.store.as_ref(), ranked, window_radius as usize).await
    }

    /// The end-to-end operation: query text in, ordered chunks out.
    ///
    /// Zero candidates (including a filter that matches nothing) is a
    /// valid empty response, not an error.
    pub async fn retrieve(
        &self,
        query: &str,
        filter: Option<&ContextFilter>,
        params: &RetrievalParams,
    ) -> Result<Vec<Chunk>> {
        params.validate()?;
        let index = self.build_index(filter, params.limit).await?;
        let candidates = self
            .retrieve_candidates(index.as_ref(), query, params.limit)
            .await?;
        debug!(candidates = candidates.len(), "retrieved candidates");
        let ranked = rank::rank(candidates);
        window::expand(self.store.as_ref(), &ranked, params.window_radius as usize).await
    }

    /// By-identifier variant: the named node becomes the sole ranked hit
    /// (score `None`), skipping index construction and similarity search.
    ///
    /// An unknown `node_id` fails with
    /// [`Error::NodeNotFound`] — the node is the direct request target,
    /// so the window-fill drop policy does not apply here.
    pub async fn retrieve_by_node(
        &self,
        node_id: &str,
        params: &RetrievalParams,
    ) -> Result<Vec<Chunk>> {
        params.validate()?;
        let node = self
            .store
            .get_node(node_id)
            .await?
            .ok_or_else(|| Error::NodeNotFound(node_id.to_string()))?;
        let ranked = vec![ScoredNode::from_node(&node, None)];
        window::expand(self.store.as_ref(), &ranked, params.window_radius as usize).await
    }
}
