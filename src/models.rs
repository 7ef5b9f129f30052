//! Core data models for the retrieval pipeline.
//!
//! These types represent the nodes, candidates, and chunks that flow
//! through index construction, ranking, and window expansion.

use serde::{Deserialize, Serialize};

/// Smallest indexed unit of document text.
///
/// Nodes are produced by ingestion (out of scope here) and read back
/// through [`NodeStore`](crate::store::NodeStore). Within a document,
/// `position` values form a contiguous `0..n` range with no gaps or
/// duplicates; that invariant is what makes window expansion safe.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub document_id: String,
    /// Zero-based ordinal within the owning document.
    pub position: usize,
    pub text: String,
    /// Embedding vector produced by an external provider. Opaque here.
    pub embedding: Vec<f32>,
    /// Opaque source metadata (file name, ingestion details, ...).
    pub metadata: serde_json::Value,
}

/// A retrieval candidate: one node plus its similarity score.
///
/// Request-scoped; carries enough of the node to rank and window without
/// another store round-trip.
#[derive(Debug, Clone)]
pub struct ScoredNode {
    pub node_id: String,
    pub document_id: String,
    pub position: usize,
    pub text: String,
    /// Similarity score from the vector index. `None` ranks as `0.0`.
    pub score: Option<f64>,
}

impl ScoredNode {
    pub fn from_node(node: &Node, score: Option<f64>) -> Self {
        Self {
            node_id: node.id.clone(),
            document_id: node.document_id.clone(),
            position: node.position,
            text: node.text.clone(),
            score,
        }
    }

    /// Score with the missing-score convention applied.
    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// Restricts which nodes participate in a query's index.
///
/// Opaque to the pipeline: the service passes it through to the index
/// backend unmodified, and only backends interpret it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextFilter {
    /// Restrict the index to these document ids. `None` means all.
    pub docs_ids: Option<Vec<String>>,
}

impl ContextFilter {
    /// Whether a node from `document_id` is eligible under this filter.
    pub fn matches(&self, document_id: &str) -> bool {
        match &self.docs_ids {
            Some(ids) => ids.iter().any(|id| id == document_id),
            None => true,
        }
    }
}

/// A `(node_id, text)` pair inside a [`Chunk`].
#[derive(Debug, Clone, Serialize)]
pub struct ChunkNode {
    pub node_id: String,
    pub text: String,
}

/// A merged, deduplicated span of node text returned to the caller.
///
/// `nodes` covers every position in `window_start..=window_end` in
/// ascending order. Within one response, chunks from the same document
/// never overlap.
#[derive(Debug, Clone, Serialize)]
pub struct Chunk {
    pub document_id: String,
    pub nodes: Vec<ChunkNode>,
    /// Maximum score among the nodes that contributed to this window.
    pub score: f64,
    /// First node position covered (inclusive).
    pub window_start: usize,
    /// Last node position covered (inclusive).
    pub window_end: usize,
}

impl Chunk {
    /// The chunk's full text, node texts joined in position order.
    pub fn text(&self) -> String {
        self.nodes
            .iter()
            .map(|n| n.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
