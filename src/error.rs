//! Error taxonomy for the retrieval pipeline.
//!
//! Collaborator failures are never swallowed or retried here: anything an
//! external component reports rides through via [`Error::External`]. The
//! one deviation is the missing-node policy inside window expansion, where
//! the affected chunk is dropped (with a logged inconsistency) instead of
//! failing the whole response — see [`window`](crate::window).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Request parameters rejected before any external call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The vector index could not be constructed.
    #[error("vector index unavailable: {0}")]
    IndexUnavailable(String),

    /// A node named by the request is missing from the store.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Failure from an external collaborator, passed through unchanged.
    #[error(transparent)]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
