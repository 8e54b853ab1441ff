//! Completeness scoring.
//!
//! Aggregates the four match counts into a bounded ratio. A zero denominator
//! always contributes 0 — the guard is an explicit rule here, not a
//! floating-point accident, so a score is never NaN.

use crate::matcher::MatchOutcome;
use crate::types::{CalculationParams, ScoringMode};

/// `n / d`, defined as 0 when `d` is 0.
pub fn safe_ratio(n: usize, d: usize) -> f64 {
    if d == 0 {
        0.0
    } else {
        n as f64 / d as f64
    }
}

/// Aggregate a match outcome into a completeness score in [0, 1].
///
/// - `Unified`: one pooled ratio, `(literal_found + semantic_found) /
///   (literal_total + semantic_total)`.
/// - `Weighted`: `alpha * semantic_ratio + (1 - alpha) * literal_ratio`,
///   with each ratio guarded separately. `alpha` must have been validated
///   as present; a missing alpha falls back to 0 (literal-only weighting).
pub fn score_completeness(outcome: &MatchOutcome, params: &CalculationParams) -> f64 {
    match params.mode {
        ScoringMode::Unified => safe_ratio(
            outcome.literal_found + outcome.semantic_found,
            outcome.literal_total + outcome.semantic_total,
        ),
        ScoringMode::Weighted => {
            let alpha = params.alpha.unwrap_or(0.0);
            alpha * safe_ratio(outcome.semantic_found, outcome.semantic_total)
                + (1.0 - alpha) * safe_ratio(outcome.literal_found, outcome.literal_total)
        }
    }
}
