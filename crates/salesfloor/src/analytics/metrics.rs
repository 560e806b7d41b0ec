use serde::{Deserialize, Serialize};

use super::params::AnalyticsParams;

/// Rank and blended scores for one rep against the snapshot's top performer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub performance_index: f64,
    pub balanced_score: f64,
    pub confidence_score: f64,
    pub rank: u32,
}

/// Saturating trust in a rep's metrics: 0 with no opportunities, approaching
/// 1 as volume grows, with `confidence_tau` setting the ramp.
pub fn confidence_score(opportunities: u32, params: &AnalyticsParams) -> f64 {
    1.0 - (-(opportunities as f64) / params.confidence_tau).exp()
}

#[allow(clippy::too_many_arguments)]
pub fn performance_metrics(
    rep_units: u32,
    top_units: u32,
    rep_expected: f64,
    top_expected: f64,
    opportunities: u32,
    rank: u32,
    params: &AnalyticsParams,
) -> PerformanceMetrics {
    let performance_index = if top_units > 0 {
        rep_units as f64 / top_units as f64
    } else {
        0.0
    };

    let balanced_score = if top_units > 0 && top_expected > 0.0 {
        0.6 * (rep_units as f64 / top_units as f64) + 0.4 * (rep_expected / top_expected)
    } else {
        0.0
    };

    PerformanceMetrics {
        performance_index,
        balanced_score,
        confidence_score: confidence_score(opportunities, params),
        rank,
    }
}
