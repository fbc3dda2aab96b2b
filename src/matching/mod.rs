//! Fuzzy matching shared by every search provider.
//!
//! This module provides case-insensitive subsequence matching with integer
//! scores and the matched offsets used for highlighting.

pub mod fuzzy_matcher;

pub use fuzzy_matcher::{
    fuzzy_match, is_word_boundary, FuzzyMatcher, MatchResult, BONUS_BOUNDARY, BONUS_CONSECUTIVE,
    PENALTY_GAP, SCORE_MATCH,
};
