//! Error types for descriptor loading.
//!
//! Searches themselves never fail; an unreachable route is an empty result.

use thiserror::Error;

/// Result type alias for descriptor operations.
pub type Result<T> = std::result::Result<T, DescriptorError>;

/// Errors raised while turning topology or strategy descriptors into a graph.
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// Descriptor text is not JSON of the expected shape.
    #[error("invalid descriptor: {0}")]
    Json(#[from] serde_json::Error),

    /// A node id is declared twice.
    #[error("duplicate node id '{id}'")]
    DuplicateNode { id: String },

    /// Two edges resolve to the same edge id.
    #[error("duplicate edge id '{id}'")]
    DuplicateEdge { id: String },

    /// A required identifier is the empty string.
    #[error("empty {what} id")]
    EmptyId { what: &'static str },

    /// Two strategies share a strategy id.
    #[error("duplicate strategy id {id}")]
    DuplicateStrategy { id: u32 },
}

/// An unrecognised search mode name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid search mode '{0}': use 'exhaustive' (dfs) or 'first-found' (bfs)")]
pub struct ParseModeError(pub String);
