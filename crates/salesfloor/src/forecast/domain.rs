use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::analytics::RepId;

/// Tag written onto every persisted forecast row so downstream consumers can
/// tell which generation of the model produced it.
pub const MODEL_VERSION: &str = "v1-binomial";

/// Month-to-date funnel aggregates handed over by the data-access
/// collaborator, already rolled up from raw deal and activity records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthToDateCounts {
    pub leads: u32,
    pub contacts: u32,
    pub appts_set: u32,
    pub appts_show: u32,
    pub sold_units: u32,
}

/// Derived per-rep month snapshot persisted alongside the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepMonthStats {
    pub rep_id: RepId,
    pub month: NaiveDate,
    pub leads: u32,
    pub contacts: u32,
    pub appts_set: u32,
    pub appts_show: u32,
    pub sold_units: u32,
    pub close_rate: f64,
    pub contact_rate: f64,
}

impl RepMonthStats {
    pub fn from_counts(rep_id: RepId, month: NaiveDate, counts: MonthToDateCounts) -> Self {
        let close_rate = if counts.appts_show > 0 {
            counts.sold_units as f64 / counts.appts_show as f64
        } else {
            0.0
        };
        let contact_rate = if counts.leads > 0 {
            counts.contacts as f64 / counts.leads as f64
        } else {
            0.0
        };

        Self {
            rep_id,
            month,
            leads: counts.leads,
            contacts: counts.contacts,
            appts_set: counts.appts_set,
            appts_show: counts.appts_show,
            sold_units: counts.sold_units,
            close_rate,
            contact_rate,
        }
    }
}

/// Inputs to the straight-line month-end extrapolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    pub sold_units_so_far: u32,
    pub leads_so_far: u32,
    pub close_rate: f64,
    pub day_of_month: u32,
    pub days_in_month: u32,
}

/// Inputs to the binomial quota-tail computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaProbabilityInput {
    pub quota_units: u32,
    pub sold_units_so_far: u32,
    pub leads_remaining: u32,
    pub close_probability: f64,
}

/// Which lever the rep should pull next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionFocus {
    MaintainPace,
    ImproveContactRate,
    ImproveShowRate,
    IncreaseLeads,
}

impl ActionFocus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::MaintainPace => "Maintain pace",
            Self::ImproveContactRate => "Improve contact rate",
            Self::ImproveShowRate => "Improve show rate",
            Self::IncreaseLeads => "Increase leads",
        }
    }
}

/// Coaching prescription attached to a forecast, with the size of the change
/// it is asking for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextBestAction {
    pub focus: ActionFocus,
    pub message: String,
    pub target_delta: u32,
}

/// The persisted forecast row, upserted idempotently on `(rep_id, month)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepMonthForecast {
    pub rep_id: RepId,
    pub month: NaiveDate,
    pub quota_units: u32,
    pub projected_units: f64,
    pub quota_hit_probability: f64,
    pub expected_future_deals: f64,
    pub next_best_action: NextBestAction,
    pub model_version: String,
}

/// First calendar day of `date`'s month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = month_start(date);
    let next = next_month_start(date);
    (next - first).num_days().max(0) as u32
}

fn next_month_start(date: NaiveDate) -> NaiveDate {
    let first = month_start(date);
    let rollover = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    rollover.unwrap_or(first)
}
