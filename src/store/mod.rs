//! Node storage abstraction.
//!
//! The [`NodeStore`] trait is the read-only view of ingested documents
//! that ranking and window expansion depend on. Implementations must be
//! `Send + Sync` to work with async runtimes; the in-memory reference
//! implementation lives in [`memory`].
//!
//! The pipeline never writes through this trait: documents are immutable
//! once ingested, and ingestion belongs to the surrounding system.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Node;

/// Read-only access to ingested nodes.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_node`](NodeStore::get_node) | Look up a node by id (by-id retrieval) |
/// | [`node_at`](NodeStore::node_at) | Look up the node at a document position (window fill) |
/// | [`document_length`](NodeStore::document_length) | Node count of a document (window clipping) |
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Fetch a node by id. `Ok(None)` when the id is unknown.
    async fn get_node(&self, node_id: &str) -> Result<Option<Node>>;

    /// Fetch the node at `position` within `document_id`.
    ///
    /// `Ok(None)` when the document is unknown or the position is out of
    /// range — callers treat that as an index/store inconsistency.
    async fn node_at(&self, document_id: &str, position: usize) -> Result<Option<Node>>;

    /// Number of nodes in `document_id`. Zero for unknown documents.
    async fn document_length(&self, document_id: &str) -> Result<usize>;
}
