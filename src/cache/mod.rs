//! Caching utilities for provider candidate sets.
//!
//! This module provides a TTL-bound snapshot cache so providers with an
//! expensive candidate scan do not repeat it on every keystroke.

pub mod candidate_cache;

pub use candidate_cache::CandidateCache;
