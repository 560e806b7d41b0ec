use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::baselines::StoreBaselines;
use super::catchup::CatchUpTarget;
use super::domain::{RepPeriodStats, SourceId};
use super::expected::ExpectedUnits;
use super::params::AnalyticsParams;
use super::rates::core_rates;
use super::weights::SourceWeights;

/// Fallback contact efficiency when a rep has logged no attempts at all.
const DEFAULT_CONTACT_EFFICIENCY: f64 = 0.1;

/// How many of the heaviest sources receive a lead ask.
const TOP_SOURCE_COUNT: usize = 3;

/// Concrete activity asks that would carry a rep from current pace to the
/// catch-up target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecommendations {
    pub additional_leads_needed: BTreeMap<SourceId, u32>,
    pub required_contact_rate: f64,
    pub additional_attempts_needed: u32,
    pub is_on_track: bool,
}

pub fn activity_recommendations(
    rep: &RepPeriodStats,
    expected: &ExpectedUnits,
    target: &CatchUpTarget,
    weights: &SourceWeights,
    baselines: &StoreBaselines,
    params: &AnalyticsParams,
) -> ActivityRecommendations {
    let current_contact_rate = core_rates(rep).contact_rate;

    if target.delta_units == 0 {
        return ActivityRecommendations {
            additional_leads_needed: BTreeMap::new(),
            required_contact_rate: current_contact_rate,
            additional_attempts_needed: 0,
            is_on_track: true,
        };
    }

    let delta = target.delta_units as f64;
    let behavior = expected.contact_multiplier * expected.appointment_multiplier;

    let mut additional_leads_needed = BTreeMap::new();
    for (source, weight) in weights.top_sources(TOP_SOURCE_COUNT) {
        if weight <= 0.0 {
            continue;
        }
        let leads = (delta / (weight * behavior)).ceil() as u32;
        additional_leads_needed.insert(source, leads);
    }

    // Contact rate that would reach the target with the current lead mix,
    // holding appointment behavior fixed.
    let reachable = expected.base_expected * expected.appointment_multiplier;
    let required_multiplier = if reachable > 0.0 {
        target.target_units as f64 / reachable
    } else {
        1.0
    };
    let required_contact_rate =
        (baselines.contact_rate * required_multiplier).min(params.max_realistic_contact_rate);

    let contact_efficiency = if rep.attempts > 0 {
        rep.contacts as f64 / rep.attempts as f64
    } else {
        DEFAULT_CONTACT_EFFICIENCY
    };
    let additional_contacts =
        ((required_contact_rate - current_contact_rate) * rep.unique_leads_attempted as f64).max(0.0);
    let additional_attempts_needed = if contact_efficiency > 0.0 {
        (additional_contacts / contact_efficiency).ceil() as u32
    } else {
        0
    };

    ActivityRecommendations {
        additional_leads_needed,
        required_contact_rate,
        additional_attempts_needed,
        is_on_track: false,
    }
}
