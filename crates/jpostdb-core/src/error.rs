// crates/jpostdb-core/src/error.rs
use thiserror::Error;

/// Errors surfaced by `jpostdb-core`.
///
/// The search controller never propagates these to its caller: it logs them
/// and turns them into a fixed user-facing message. They reach callers only
/// through the transport trait and the batch loader.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The server answered with a non-2xx status.
    #[error("request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    /// Network-level failure (connection refused, DNS, aborted fetch, ...).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("missing environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("unknown catalog variant: {0}")]
    UnknownVariant(String),
}

impl CatalogError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        CatalogError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
