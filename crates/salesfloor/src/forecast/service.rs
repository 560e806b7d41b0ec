use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analytics::RepId;

use super::action::compute_next_best_action;
use super::domain::{
    days_in_month, month_start, ProjectionInput, QuotaProbabilityInput, RepMonthForecast,
    RepMonthStats, MODEL_VERSION,
};
use super::projection::compute_projected_units;
use super::quota::compute_quota_probability;
use super::store::ForecastStore;

/// Request to refresh one rep's month forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecomputeInput {
    pub rep_id: RepId,
    pub quota_units: u32,
    /// Any date inside the month to recompute; defaults to `today`'s month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<NaiveDate>,
}

/// What the caller gets back; the full row lands in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecomputeResult {
    pub month: NaiveDate,
    pub projected_units: f64,
    pub quota_hit_probability: f64,
}

/// Recomputes and persists a rep's month-end forecast over a
/// [`ForecastStore`]. Stateless between calls; results are deterministic
/// given the same stored counts, so repeated or concurrent recomputes for
/// the same `(rep_id, month)` converge on the same row.
pub struct ForecastService<S> {
    store: Arc<S>,
}

impl<S> ForecastService<S>
where
    S: ForecastStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Any store failure is non-fatal: log a warning, return `None`, and
    /// leave previously persisted rows untouched. Retry policy belongs to
    /// the caller.
    pub fn recompute(&self, input: &RecomputeInput, today: NaiveDate) -> Option<RecomputeResult> {
        let month = month_start(input.month.unwrap_or(today));

        let counts = match self.store.month_to_date(&input.rep_id, month) {
            Ok(counts) => counts,
            Err(err) => {
                warn!(rep_id = %input.rep_id, %month, error = %err, "month-to-date query failed; skipping forecast recompute");
                return None;
            }
        };

        let stats = RepMonthStats::from_counts(input.rep_id.clone(), month, counts);
        if let Err(err) = self.store.upsert_month_stats(&stats) {
            warn!(rep_id = %input.rep_id, %month, error = %err, "month stats upsert failed; skipping forecast recompute");
            return None;
        }

        let days = days_in_month(month);
        // A month in the past (or future) is treated as fully elapsed.
        let day_of_month = if month_start(today) == month {
            today.day().max(1)
        } else {
            days
        };
        let days_remaining = days.saturating_sub(day_of_month);

        let leads_per_day = counts.leads as f64 / day_of_month.max(1) as f64;
        let leads_remaining = (leads_per_day * days_remaining as f64).round() as u32;
        let close_probability = if counts.contacts > 0 {
            counts.sold_units as f64 / counts.contacts as f64
        } else {
            0.0
        };

        let projected_units = compute_projected_units(&ProjectionInput {
            sold_units_so_far: counts.sold_units,
            leads_so_far: counts.leads,
            close_rate: close_probability,
            day_of_month,
            days_in_month: days,
        });
        let quota_hit_probability = compute_quota_probability(&QuotaProbabilityInput {
            quota_units: input.quota_units,
            sold_units_so_far: counts.sold_units,
            leads_remaining,
            close_probability,
        });
        let expected_future_deals = leads_remaining as f64 * close_probability;
        let next_best_action =
            compute_next_best_action(&stats, quota_hit_probability, projected_units, input.quota_units);

        let forecast = RepMonthForecast {
            rep_id: input.rep_id.clone(),
            month,
            quota_units: input.quota_units,
            projected_units,
            quota_hit_probability,
            expected_future_deals,
            next_best_action,
            model_version: MODEL_VERSION.to_string(),
        };
        if let Err(err) = self.store.upsert_forecast(&forecast) {
            warn!(rep_id = %input.rep_id, %month, error = %err, "forecast upsert failed; prior row left in place");
            return None;
        }

        Some(RecomputeResult {
            month,
            projected_units,
            quota_hit_probability,
        })
    }
}
