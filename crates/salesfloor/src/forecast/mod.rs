mod action;
mod domain;
mod projection;
mod quota;
mod service;
mod store;

pub use action::compute_next_best_action;
pub use domain::{
    days_in_month, month_start, ActionFocus, MonthToDateCounts, NextBestAction, ProjectionInput,
    QuotaProbabilityInput, RepMonthForecast, RepMonthStats, MODEL_VERSION,
};
pub use projection::compute_projected_units;
pub use quota::compute_quota_probability;
pub use service::{ForecastService, RecomputeInput, RecomputeResult};
pub use store::{ForecastStore, StoreError};
