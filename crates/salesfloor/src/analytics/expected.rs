use serde::{Deserialize, Serialize};

use super::baselines::StoreBaselines;
use super::domain::RepPeriodStats;
use super::params::AnalyticsParams;
use super::rates::core_rates;
use super::weights::SourceWeights;

/// Model-predicted unit sales for one rep: lead-mix quality times bounded
/// behavior adjustments against the store baselines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedUnits {
    pub base_expected: f64,
    pub contact_multiplier: f64,
    pub appointment_multiplier: f64,
    pub final_expected: f64,
}

pub fn expected_units(
    rep: &RepPeriodStats,
    weights: &SourceWeights,
    baselines: &StoreBaselines,
    params: &AnalyticsParams,
) -> ExpectedUnits {
    let base_expected: f64 = rep
        .leads_by_source
        .iter()
        .map(|(source, &leads)| leads as f64 * weights.get(source).unwrap_or(0.0))
        .sum();

    let rates = core_rates(rep);

    let contact_multiplier = behavior_multiplier(
        rates.contact_rate,
        baselines.contact_rate,
        params.contact_multiplier_bounds,
    );
    let appointment_multiplier = behavior_multiplier(
        rates.appointment_set_rate,
        baselines.appointment_set_rate,
        params.appointment_multiplier_bounds,
    );

    ExpectedUnits {
        base_expected,
        contact_multiplier,
        appointment_multiplier,
        final_expected: base_expected * contact_multiplier * appointment_multiplier,
    }
}

/// Rep rate relative to store rate, clamped; a dead store baseline reads as
/// neutral rather than dividing by zero.
fn behavior_multiplier(rep_rate: f64, store_rate: f64, bounds: (f64, f64)) -> f64 {
    let ratio = if store_rate > 0.0 {
        rep_rate / store_rate
    } else {
        1.0
    };
    ratio.clamp(bounds.0, bounds.1)
}
