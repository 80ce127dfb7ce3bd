use thiserror::Error;

use crate::graph::DropReason;

/// Convenient result alias for the shared walk library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested start or end identifier is not a node of the graph.
    #[error("unknown location: {id}{}", format_drop_reason(.dropped))]
    NodeNotFound {
        id: String,
        /// Why the location was left out of the graph, when it was supplied
        /// by the caller but could not be placed.
        dropped: Option<DropReason>,
    },

    /// Raised when a caller tries to insert an edge that would break the
    /// graph invariants (self loops, negative or non-finite weights).
    #[error("invalid edge {from} -> {to}: {message}")]
    InvalidEdge {
        from: String,
        to: String,
        message: String,
    },

    /// Raised when an environment override cannot be parsed.
    #[error("invalid configuration for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::NodeNotFound`] without drop information.
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Error::NodeNotFound {
            id: id.into(),
            dropped: None,
        }
    }
}

fn format_drop_reason(dropped: &Option<DropReason>) -> String {
    match dropped {
        Some(reason) => format!(" (dropped from the graph: {})", reason),
        None => String::new(),
    }
}

/// Failure reported by an external collaborator (geocoder or walking router).
///
/// These never abort a computation: the caches absorb them into "no
/// coordinate" or an unreachable distance.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}
