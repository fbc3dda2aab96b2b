//! Omnisearch MCP Server - on-device unified search exposed over the Model Context Protocol.
//!
//! One query fans out to several providers (installed applications,
//! contacts, indexed files, user commands); each matches its candidates with
//! the shared fuzzy matcher and the aggregator merges everything into a
//! single ranked list. Directory roots are indexed in the background in
//! batches, with per-root scan state kept in the settings record.
//!
//! # Architecture
//!
//! - **matching**: Subsequence fuzzy matcher with highlight offsets
//! - **models**: Queries, results, indexed documents and the settings record
//! - **domain**: Validated indexing trigger input
//! - **repositories**: Document and settings store contracts and implementations
//! - **providers**: The `Provider` trait and its four variants
//! - **aggregator**: Concurrent fan-out, failure isolation and merged ranking
//! - **indexing**: Batched directory walk and the per-root scheduler
//! - **launcher**: Carries out the action of a selected result
//! - **services**: Business logic behind the MCP tools
//! - **server**: MCP protocol server

pub mod aggregator;
pub mod cache;
pub mod cancel;
pub mod config;
pub mod domain;
pub mod error;
pub mod indexing;
pub mod launcher;
pub mod matching;
pub mod models;
pub mod observability;
pub mod providers;
pub mod repositories;
pub mod server;
pub mod services;

pub use aggregator::SearchAggregator;
pub use cache::CandidateCache;
pub use cancel::CancellationToken;
pub use config::Config;
pub use error::{
    ConfigError, IndexingError, LaunchError, ProviderError, SearchError, StoreError,
};
pub use indexing::{IndexOutcome, IndexScheduler, IndexingPipeline};
pub use matching::{fuzzy_match, FuzzyMatcher, MatchResult};
pub use models::{IndexedDocument, ProviderResult, Query, ScanMetadata, ScanState, Settings};
pub use observability::MetricsTracker;
pub use providers::Provider;
pub use server::OmnisearchMcpServer;
