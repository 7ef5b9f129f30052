//! # Excerpt Core
//!
//! Chunk retrieval and context-window construction over ingested documents.
//!
//! Given a free-text query (or a raw node id), the pipeline finds the most
//! semantically relevant nodes, ranks them deterministically, and widens
//! each hit into a contiguous, deduplicated excerpt that carries
//! surrounding context from the same source document:
//!
//! ```text
//! query ──▶ vector index ──▶ ranked nodes ──▶ merged context windows
//! ```
//!
//! Everything with I/O behind it — node storage, index construction,
//! query embedding — sits behind async traits ([`store::NodeStore`],
//! [`index::IndexBackend`], [`embedding::EmbeddingProvider`]). The ranking
//! and window-merge stages are pure functions. In-memory implementations
//! of every seam live in [`store::memory`] for tests and small corpora.

pub mod embedding;
pub mod error;
pub mod index;
pub mod models;
pub mod rank;
pub mod service;
pub mod store;
pub mod window;
