//! In-memory implementations of the collaborator seams.
//!
//! Backed by `HashMap` and `Vec` behind `std::sync::RwLock` for thread
//! safety. The index backend scans the store at build time and scores
//! with brute-force cosine similarity, which is plenty for tests and for
//! applications that keep their corpus in memory.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::embedding::{cosine_similarity, EmbeddingProvider};
use crate::error::Result;
use crate::index::{IndexBackend, VectorIndex};
use crate::models::{ContextFilter, Node, ScoredNode};

use super::NodeStore;

/// In-memory [`NodeStore`] that doubles as the node source for
/// [`InMemoryIndexBackend`].
pub struct InMemoryNodeStore {
    nodes: RwLock<HashMap<String, Node>>,
    /// Per document: node ids in position order, so index == position.
    documents: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryNodeStore {
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a document as an ordered sequence of `(text, embedding)`
    /// nodes. Positions are assigned contiguously from zero; any previous
    /// nodes of `document_id` are replaced. Returns the new node ids in
    /// position order.
    pub fn insert_document(
        &self,
        document_id: &str,
        nodes: Vec<(String, Vec<f32>)>,
    ) -> Vec<String> {
        let mut ids = Vec::with_capacity(nodes.len());
        let mut stored = self.nodes.write().unwrap();
        let mut documents = self.documents.write().unwrap();
        if let Some(old_ids) = documents.remove(document_id) {
            for id in old_ids {
                stored.remove(&id);
            }
        }
        for (position, (text, embedding)) in nodes.into_iter().enumerate() {
            let id = Uuid::new_v4().to_string();
            stored.insert(
                id.clone(),
                Node {
                    id: id.clone(),
                    document_id: document_id.to_string(),
                    position,
                    text,
                    embedding,
                    metadata: serde_json::Value::Null,
                },
            );
            ids.push(id);
        }
        documents.insert(document_id.to_string(), ids.clone());
        ids
    }

    fn nodes_matching(&self, filter: Option<&ContextFilter>) -> Vec<Node> {
        let nodes = self.nodes.read().unwrap();
        let mut matching: Vec<Node> = nodes
            .values()
            .filter(|n| filter.map_or(true, |f| f.matches(&n.document_id)))
            .cloned()
            .collect();
        // Map iteration order is arbitrary; snapshot in document order so
        // equal-scored candidates rank and truncate deterministically.
        matching.sort_by(|a, b| {
            a.document_id
                .cmp(&b.document_id)
                .then(a.position.cmp(&b.position))
        });
        matching
    }
}

impl Default for InMemoryNodeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeStore for InMemoryNodeStore {
    async fn get_node(&self, node_id: &str) -> Result<Option<Node>> {
        Ok(self.nodes.read().unwrap().get(node_id).cloned())
    }

    async fn node_at(&self, document_id: &str, position: usize) -> Result<Option<Node>> {
        let documents = self.documents.read().unwrap();
        let id = match documents.get(document_id).and_then(|ids| ids.get(position)) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        Ok(self.nodes.read().unwrap().get(&id).cloned())
    }

    async fn document_length(&self, document_id: &str) -> Result<usize> {
        let documents = self.documents.read().unwrap();
        Ok(documents.get(document_id).map_or(0, |ids| ids.len()))
    }
}

/// Builds brute-force indexes over an [`InMemoryNodeStore`].
pub struct InMemoryIndexBackend {
    store: Arc<InMemoryNodeStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl InMemoryIndexBackend {
    pub fn new(store: Arc<InMemoryNodeStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }
}

#[async_trait]
impl IndexBackend for InMemoryIndexBackend {
    async fn build(
        &self,
        filter: Option<&ContextFilter>,
        limit: i64,
    ) -> Result<Box<dyn VectorIndex>> {
        // A filter matching nothing builds an empty index, not an error.
        Ok(Box::new(InMemoryVectorIndex {
            nodes: self.store.nodes_matching(filter),
            embedder: self.embedder.clone(),
            limit: limit.max(0) as usize,
        }))
    }
}

/// Brute-force cosine-similarity index over a snapshot of nodes.
pub struct InMemoryVectorIndex {
    nodes: Vec<Node>,
    embedder: Arc<dyn EmbeddingProvider>,
    limit: usize,
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn query(&self, query: &str) -> Result<Vec<ScoredNode>> {
        if self.nodes.is_empty() {
            return Ok(Vec::new());
        }
        let query_vec = self.embedder.embed_query(query).await?;
        let mut candidates: Vec<ScoredNode> = self
            .nodes
            .iter()
            .map(|n| {
                let sim = cosine_similarity(&query_vec, &n.embedding) as f64;
                ScoredNode::from_node(n, Some(sim))
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.score_or_zero()
                .partial_cmp(&a.score_or_zero())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(self.limit);
        Ok(candidates)
    }
}
