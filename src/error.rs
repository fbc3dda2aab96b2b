//! Error types for the Omnisearch MCP Server.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use crate::domain::ValidationError;
use thiserror::Error;

/// Errors raised by the durable document store and the settings store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying I/O failed
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted record could not be (de)serialized
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store rejected the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Change was refused before reaching the store
    #[error("Settings change rejected: {0}")]
    Rejected(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Errors a single provider can raise while answering a query.
///
/// These never escape the aggregator; a failing provider simply
/// contributes no results for that pass.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Candidate source could not be read
    #[error("Provider source unavailable: {0}")]
    SourceUnavailable(String),

    /// Store backing the provider failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Query was abandoned because a newer one superseded it
    #[error("Provider query cancelled")]
    Cancelled,

    /// Generic provider error
    #[error("Provider error: {0}")]
    Other(String),
}

/// Errors surfaced by an indexing pass.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Trigger input was blank, missing or unresolvable; nothing was mutated
    #[error("Invalid indexing input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Directory walk failed
    #[error("I/O error while indexing {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Persisting documents or scan state failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Pass was cancelled cooperatively
    #[error("Indexing cancelled")]
    Cancelled,
}

/// Errors that can occur during an aggregated search.
#[derive(Error, Debug)]
pub enum SearchError {
    /// A newer query cancelled this one before it was published
    #[error("Search superseded by a newer query")]
    Superseded,

    /// No result with that id exists in the latest result set
    #[error("Unknown result id: {0}")]
    UnknownResult(String),

    /// Invalid search parameters
    #[error("Invalid search parameters: {0}")]
    InvalidParameters(String),
}

/// Errors raised while acting on a selected result.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The OS refused to start the target
    #[error("Permission denied launching {0}")]
    PermissionDenied(String),

    /// Target could not be spawned
    #[error("Failed to launch {target}: {reason}")]
    Spawn { target: String, reason: String },
}

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Convenience type alias for Results with ProviderError
pub type ProviderQueryResult<T> = Result<T, ProviderError>;

/// Convenience type alias for Results with IndexingError
pub type IndexingResult<T> = Result<T, IndexingError>;

/// Convenience type alias for Results with SearchError
pub type SearchResult<T> = Result<T, SearchError>;

/// Convenience type alias for Results with LaunchError
pub type LaunchResult<T> = Result<T, LaunchError>;
