//! Subsequence fuzzy matcher shared by every provider.
//!
//! Every character of the query must appear in the candidate, in order,
//! compared case-insensitively. Matching is greedy left to right and the
//! offsets it consumes are exactly the offsets that get scored and returned
//! for highlighting.
//!
//! Scoring (all integers, so results are totally ordered):
//! - [`SCORE_MATCH`] for every matched character
//! - [`BONUS_CONSECUTIVE`] when a match directly follows the previous one
//! - [`BONUS_BOUNDARY`] once, when the first match sits at offset 0 or right
//!   after a word separator (space, `/`, `-`, `_`)
//! - [`PENALTY_GAP`] for every unmatched character between the first and
//!   last match
//!
//! The empty query matches every candidate with score 0 and no indices.

/// Points for each matched character.
pub const SCORE_MATCH: i32 = 16;

/// Extra points when a matched character directly follows the previous one.
pub const BONUS_CONSECUTIVE: i32 = 24;

/// Extra points when the match starts at a word boundary.
pub const BONUS_BOUNDARY: i32 = 32;

/// Points removed per skipped character inside the matched span.
pub const PENALTY_GAP: i32 = 1;

/// Result of matching a query against one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Match score; higher is better
    pub score: i32,

    /// Char offsets (not byte offsets) into the candidate that were matched
    pub matched_indices: Vec<usize>,
}

/// A query prepared once per pass and matched against many candidates.
#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    needle: Vec<char>,
}

impl FuzzyMatcher {
    /// Prepare a matcher for `query`.
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.chars().map(fold_case).collect(),
        }
    }

    /// True when the prepared query is empty.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Match the prepared query against `candidate`.
    ///
    /// Returns `None` when some query character cannot be found after the
    /// current candidate cursor.
    pub fn match_candidate(&self, candidate: &str) -> Option<MatchResult> {
        if self.needle.is_empty() {
            return Some(MatchResult {
                score: 0,
                matched_indices: Vec::new(),
            });
        }

        let mut matched_indices = Vec::with_capacity(self.needle.len());
        let mut score = 0i32;
        let mut previous_match: Option<usize> = None;
        let mut previous_char: Option<char> = None;
        let mut next = 0usize;

        for (offset, c) in candidate.chars().enumerate() {
            if next == self.needle.len() {
                break;
            }

            if fold_case(c) == self.needle[next] {
                score += SCORE_MATCH;
                match previous_match {
                    Some(prev) if prev + 1 == offset => score += BONUS_CONSECUTIVE,
                    Some(prev) => {
                        let gap = i32::try_from(offset - prev - 1).unwrap_or(i32::MAX);
                        score = score.saturating_sub(gap.saturating_mul(PENALTY_GAP));
                    }
                    None => {
                        if previous_char.map_or(true, is_word_boundary) {
                            score += BONUS_BOUNDARY;
                        }
                    }
                }
                matched_indices.push(offset);
                previous_match = Some(offset);
                next += 1;
            }

            previous_char = Some(c);
        }

        if next < self.needle.len() {
            return None;
        }

        Some(MatchResult {
            score,
            matched_indices,
        })
    }
}

/// Match `query` against `candidate` in one call.
///
/// Prefer [`FuzzyMatcher`] when the same query is matched against many
/// candidates.
pub fn fuzzy_match(query: &str, candidate: &str) -> Option<MatchResult> {
    FuzzyMatcher::new(query).match_candidate(candidate)
}

/// Characters after which a match counts as starting a new word.
pub fn is_word_boundary(c: char) -> bool {
    matches!(c, ' ' | '/' | '-' | '_')
}

// One-to-one lowercase so offsets stay aligned with the candidate's chars.
fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
