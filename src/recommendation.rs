//! Recommendation scorer.
//!
//! Each dimension is normalized against a reference scale with a
//! hyperbolic curve, `100 × ref / (ref + x)`, which is 100 at zero, 50 at
//! the reference value, and strictly decreasing. The weighted mean of the
//! cost and duration sub-scores is then adjusted by a fixed risk penalty
//! and an optional live-migration bonus, and clamped to [0, 100].
//!
//! Lowering cost, duration, or risk level never lowers the score.

use crate::models::{CostBreakdown, DurationSummary, RiskAssessment, TargetProfile};
use crate::settings::ScoringConfig;

/// Upper bound of the score.
pub const MAX_SCORE: f64 = 100.0;

/// Weighted suitability scorer.
#[derive(Debug, Clone, Default)]
pub struct RecommendationScorer {
    config: ScoringConfig,
}

impl RecommendationScorer {
    /// Creates a scorer from configuration.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Scores a scenario in [0, 100].
    pub fn score(
        &self,
        cost: &CostBreakdown,
        duration: &DurationSummary,
        risk: &RiskAssessment,
        target: &TargetProfile,
    ) -> f64 {
        let c = &self.config;
        let scored_cost = cost.migration_total + cost.runtime_monthly_total * c.runtime_horizon_months;

        let cost_score = normalize(scored_cost, c.reference_cost);
        let duration_score = normalize(duration.total_days, c.reference_days);
        let weighted = (c.cost_weight * cost_score + c.duration_weight * duration_score)
            / (c.cost_weight + c.duration_weight);

        let bonus = if target.supports_live_migration {
            c.live_migration_bonus
        } else {
            0.0
        };
        let score = (weighted - c.risk_penalty(risk.level) + bonus).clamp(0.0, MAX_SCORE);

        tracing::debug!(
            target = %target.id,
            cost_score,
            duration_score,
            risk = %risk.level,
            score,
            "Scored scenario"
        );
        score
    }

    /// Whether a score clears the recommendation threshold.
    pub fn is_recommended(&self, score: f64) -> bool {
        score >= self.config.recommendation_threshold
    }
}

/// `100 × reference / (reference + value)`; NaN and negatives count as 0.
fn normalize(value: f64, reference: f64) -> f64 {
    let value = if value.is_nan() { 0.0 } else { value.max(0.0) };
    if value.is_infinite() {
        return 0.0;
    }
    MAX_SCORE * reference / (reference + value)
}
