mod baselines;
mod catchup;
mod domain;
mod expected;
mod metrics;
mod params;
mod rates;
mod recommendations;
mod weights;

pub use baselines::{store_baselines, StoreBaselines};
pub use catchup::{catch_up_target, CatchUpTarget};
pub use domain::{RepId, RepPeriodStats, SourceId};
pub use expected::{expected_units, ExpectedUnits};
pub use metrics::{confidence_score, performance_metrics, PerformanceMetrics};
pub use params::AnalyticsParams;
pub use rates::{core_rates, CoreRates};
pub use recommendations::{activity_recommendations, ActivityRecommendations};
pub use weights::{estimate_source_weights, SourceWeights};

use std::collections::BTreeMap;

use serde::Serialize;

pub(crate) fn safe_divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Store-wide quantities fitted once per snapshot and shared by every
/// per-rep evaluation: source weights, baselines, and the ranking order.
///
/// Fitting is the expensive part of an analysis pass. Callers that evaluate
/// the same snapshot repeatedly can hold a fitted model and call
/// [`PerformanceAnalyzer::analyze_rep`] per rep; nothing in the model
/// mutates afterward, so per-rep evaluation can run in parallel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationModel {
    pub source_weights: SourceWeights,
    pub store_baselines: StoreBaselines,
    pub top_performer_units: u32,
    pub top_expected_units: f64,
    ranking: Vec<RepId>,
}

impl PopulationModel {
    pub fn fit(reps: &[RepPeriodStats], params: &AnalyticsParams) -> Self {
        let source_weights = estimate_source_weights(reps, params);
        let store_baselines = store_baselines(reps);

        let mut order: Vec<&RepPeriodStats> = reps.iter().collect();
        order.sort_by(|a, b| {
            b.units_sold
                .cmp(&a.units_sold)
                .then_with(|| a.rep_id.cmp(&b.rep_id))
        });

        let top_performer_units = order.first().map(|rep| rep.units_sold).unwrap_or(0);
        let top_expected_units = order
            .first()
            .map(|rep| expected_units(rep, &source_weights, &store_baselines, params).final_expected)
            .unwrap_or(0.0);
        let ranking = order.into_iter().map(|rep| rep.rep_id.clone()).collect();

        Self {
            source_weights,
            store_baselines,
            top_performer_units,
            top_expected_units,
            ranking,
        }
    }

    /// 1-based leaderboard position: units sold descending, then rep id
    /// ascending so equal sellers rank deterministically.
    pub fn rank_of(&self, rep_id: &RepId) -> Option<u32> {
        self.ranking
            .iter()
            .position(|candidate| candidate == rep_id)
            .map(|index| index as u32 + 1)
    }

    pub fn population_size(&self) -> usize {
        self.ranking.len()
    }
}

/// Everything the dashboard needs to render one rep's row and detail panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepAnalysis {
    pub rep: RepPeriodStats,
    pub core_rates: CoreRates,
    pub expected_units: ExpectedUnits,
    pub catch_up_target: CatchUpTarget,
    pub activity_recommendations: ActivityRecommendations,
    pub performance_metrics: PerformanceMetrics,
    pub source_weights: SourceWeights,
    pub store_baselines: StoreBaselines,
    pub is_top_performer: bool,
}

/// Stateless pipeline over a single-period snapshot of the rep population.
#[derive(Debug, Clone)]
pub struct PerformanceAnalyzer {
    params: AnalyticsParams,
}

impl PerformanceAnalyzer {
    pub fn new(params: AnalyticsParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AnalyticsParams {
        &self.params
    }

    /// Run the full pipeline for every rep in the snapshot. An empty
    /// population yields an empty map, never an error.
    pub fn analyze(&self, reps: &[RepPeriodStats]) -> BTreeMap<RepId, RepAnalysis> {
        if reps.is_empty() {
            return BTreeMap::new();
        }

        let model = PopulationModel::fit(reps, &self.params);
        reps.iter()
            .map(|rep| (rep.rep_id.clone(), self.analyze_rep(&model, rep)))
            .collect()
    }

    /// Evaluate one rep against an already-fitted model. Pure in both
    /// arguments; independent calls may run concurrently.
    pub fn analyze_rep(&self, model: &PopulationModel, rep: &RepPeriodStats) -> RepAnalysis {
        let core_rates = core_rates(rep);
        let expected_units = expected_units(
            rep,
            &model.source_weights,
            &model.store_baselines,
            &self.params,
        );
        let catch_up_target =
            catch_up_target(rep.units_sold, model.top_performer_units, &self.params);
        let activity_recommendations = activity_recommendations(
            rep,
            &expected_units,
            &catch_up_target,
            &model.source_weights,
            &model.store_baselines,
            &self.params,
        );

        // A rep outside the fitted snapshot ranks after everyone in it.
        let rank = model
            .rank_of(&rep.rep_id)
            .unwrap_or(model.population_size() as u32 + 1);
        let performance_metrics = performance_metrics(
            rep.units_sold,
            model.top_performer_units,
            expected_units.final_expected,
            model.top_expected_units,
            rep.unique_leads_attempted,
            rank,
            &self.params,
        );

        RepAnalysis {
            rep: rep.clone(),
            core_rates,
            expected_units,
            catch_up_target,
            activity_recommendations,
            performance_metrics,
            source_weights: model.source_weights.clone(),
            store_baselines: model.store_baselines,
            is_top_performer: rank == 1,
        }
    }
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new(AnalyticsParams::default())
    }
}
