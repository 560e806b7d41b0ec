use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{RepPeriodStats, SourceId};
use super::params::AnalyticsParams;

/// Expected units-per-lead by source, estimated fresh from the current
/// snapshot on every analysis pass. Weights always lie in
/// `[0, max_source_weight]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceWeights {
    weights: BTreeMap<SourceId, f64>,
    global_rate: f64,
}

impl SourceWeights {
    pub fn new(weights: BTreeMap<SourceId, f64>, global_rate: f64) -> Self {
        Self {
            weights,
            global_rate,
        }
    }

    pub fn get(&self, source: &SourceId) -> Option<f64> {
        self.weights.get(source).copied()
    }

    /// Population-wide units per lead; the prior every source shrinks toward.
    pub fn global_rate(&self) -> f64 {
        self.global_rate
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SourceId, f64)> {
        self.weights.iter().map(|(source, weight)| (source, *weight))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// The `n` heaviest sources, weight descending; ties break on source
    /// name ascending so the selection is total and reproducible.
    pub fn top_sources(&self, n: usize) -> Vec<(SourceId, f64)> {
        let mut entries: Vec<(SourceId, f64)> = self
            .weights
            .iter()
            .map(|(source, weight)| (source.clone(), *weight))
            .collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        entries.truncate(n);
        entries
    }
}

/// Iterative cross-rep attribution of units-per-lead by source.
///
/// Fits the linear model `units_rep ~ sum(leads_source * weight_source)` by
/// coordinate-wise proportional scaling: each pass rescales every source
/// weight by the lead-weighted mean of `actual / predicted` over the reps
/// that carry it, shrinks the estimate toward the global rate, and clamps.
/// The iteration count is a tuned constant, not a convergence test.
pub fn estimate_source_weights(
    reps: &[RepPeriodStats],
    params: &AnalyticsParams,
) -> SourceWeights {
    let mut total_leads = 0u64;
    let mut total_units = 0u64;
    let mut leads_per_source: BTreeMap<SourceId, u64> = BTreeMap::new();

    for rep in reps {
        total_units += rep.units_sold as u64;
        for (source, &leads) in &rep.leads_by_source {
            total_leads += leads as u64;
            *leads_per_source.entry(source.clone()).or_insert(0) += leads as u64;
        }
    }

    let global_rate = if total_leads > 0 {
        total_units as f64 / total_leads as f64
    } else {
        0.0
    };

    let mut weights: BTreeMap<SourceId, f64> = leads_per_source
        .keys()
        .map(|source| (source.clone(), global_rate))
        .collect();

    for _ in 0..params.weight_iterations {
        let mut numerator: BTreeMap<&SourceId, f64> = BTreeMap::new();
        let mut denominator: BTreeMap<&SourceId, f64> = BTreeMap::new();

        for rep in reps {
            let predicted: f64 = rep
                .leads_by_source
                .iter()
                .map(|(source, &leads)| {
                    leads as f64 * weights.get(source).copied().unwrap_or(global_rate)
                })
                .sum();
            if predicted <= 0.0 {
                continue;
            }

            let scale = rep.units_sold as f64 / predicted;
            for (source, &leads) in &rep.leads_by_source {
                if leads == 0 {
                    continue;
                }
                *numerator.entry(source).or_insert(0.0) += leads as f64 * scale;
                *denominator.entry(source).or_insert(0.0) += leads as f64;
            }
        }

        let mut next = BTreeMap::new();
        for (source, weight) in &weights {
            let denom = denominator.get(source).copied().unwrap_or(0.0);
            if denom <= 0.0 {
                // No rep carried this source through a positive prediction.
                next.insert(source.clone(), global_rate);
                continue;
            }

            let average_scale = numerator.get(source).copied().unwrap_or(0.0) / denom;
            let updated = weight * average_scale;
            let sample_size = leads_per_source.get(source).copied().unwrap_or(0) as f64;
            let smoothed = shrink_toward_prior(
                updated,
                sample_size,
                global_rate,
                params.weight_prior_strength,
            );
            next.insert(source.clone(), smoothed.clamp(0.0, params.max_source_weight));
        }
        weights = next;
    }

    SourceWeights::new(weights, global_rate)
}

/// Empirical-Bayes shrinkage: blend the estimate with the prior mean in
/// proportion to sample size against `prior_strength` pseudo-observations.
pub(crate) fn shrink_toward_prior(
    estimate: f64,
    sample_size: f64,
    prior_mean: f64,
    prior_strength: f64,
) -> f64 {
    let denominator = sample_size + prior_strength;
    if denominator <= 0.0 {
        return prior_mean;
    }
    (estimate * sample_size + prior_mean * prior_strength) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::rep_stats;

    fn population() -> Vec<RepPeriodStats> {
        // Referral converts visibly better than walk-in across the store.
        vec![
            rep_stats("a", &[("referral", 20), ("walk_in", 30)], 50, 90, 28, 16, 12, 8),
            rep_stats("b", &[("referral", 25), ("walk_in", 15)], 40, 70, 24, 14, 11, 9),
            rep_stats("c", &[("referral", 5), ("walk_in", 45)], 50, 80, 20, 10, 7, 3),
        ]
    }

    #[test]
    fn weights_stay_within_bounds() {
        let params = AnalyticsParams::default();
        let weights = estimate_source_weights(&population(), &params);
        for (_, weight) in weights.iter() {
            assert!(weight >= 0.0);
            assert!(weight <= params.max_source_weight);
        }
    }

    #[test]
    fn stronger_converting_source_earns_higher_weight() {
        let weights = estimate_source_weights(&population(), &AnalyticsParams::default());
        let referral = weights.get(&SourceId::from("referral")).expect("referral weight");
        let walk_in = weights.get(&SourceId::from("walk_in")).expect("walk_in weight");
        assert!(
            referral > walk_in,
            "expected referral {referral} above walk_in {walk_in}"
        );
    }

    #[test]
    fn zero_lead_source_keeps_global_rate() {
        let mut reps = population();
        // Source appears in the snapshot but never carries a lead.
        reps[0].leads_by_source.insert(SourceId::from("billboard"), 0);
        let weights = estimate_source_weights(&reps, &AnalyticsParams::default());
        let billboard = weights.get(&SourceId::from("billboard")).expect("billboard weight");
        assert!((billboard - weights.global_rate()).abs() < 1e-12);
    }

    #[test]
    fn empty_population_has_no_weights_and_zero_global_rate() {
        let weights = estimate_source_weights(&[], &AnalyticsParams::default());
        assert!(weights.is_empty());
        assert_eq!(weights.global_rate(), 0.0);
    }

    #[test]
    fn iteration_is_empirically_stable() {
        // No closed-form fixed point; assert the delta between successive
        // passes has collapsed by the default iteration count.
        let reps = population();
        let mut at_default = AnalyticsParams::default();
        at_default.weight_iterations = 6;
        let mut one_more = AnalyticsParams::default();
        one_more.weight_iterations = 7;

        let stopped = estimate_source_weights(&reps, &at_default);
        let continued = estimate_source_weights(&reps, &one_more);
        for (source, weight) in stopped.iter() {
            let next = continued.get(source).expect("source persists across passes");
            assert!(
                (weight - next).abs() < 2e-3,
                "{source} moved from {weight} to {next} after one more pass"
            );
        }
    }

    #[test]
    fn top_sources_break_ties_by_name() {
        let mut map = BTreeMap::new();
        map.insert(SourceId::from("phone"), 0.2);
        map.insert(SourceId::from("internet"), 0.2);
        map.insert(SourceId::from("walk_in"), 0.4);
        map.insert(SourceId::from("service"), 0.1);
        let weights = SourceWeights::new(map, 0.2);

        let top = weights.top_sources(3);
        let names: Vec<&str> = top.iter().map(|(source, _)| source.0.as_str()).collect();
        assert_eq!(names, vec!["walk_in", "internet", "phone"]);
    }

    #[test]
    fn shrinkage_blends_toward_prior() {
        // 100 leads against 50 pseudo-leads: two parts estimate, one part prior.
        let blended = shrink_toward_prior(0.9, 100.0, 0.3, 50.0);
        assert!((blended - (0.9 * 100.0 + 0.3 * 50.0) / 150.0).abs() < 1e-12);
        // No evidence at all: the prior wins outright.
        assert_eq!(shrink_toward_prior(0.9, 0.0, 0.3, 0.0), 0.3);
    }
}
