use chrono::NaiveDate;

use crate::analytics::RepId;

use super::domain::{MonthToDateCounts, RepMonthForecast, RepMonthStats};

/// Persistence seam between the forecast engine and whatever actually holds
/// deal and activity records. Kept behind a trait so the pipeline can be
/// exercised without a database; both upserts are keyed `(rep_id, month)`
/// and must be idempotent.
pub trait ForecastStore: Send + Sync {
    /// Aggregated funnel counts for the rep between the first of `month`
    /// (inclusive) and the first of the next month (exclusive).
    fn month_to_date(&self, rep_id: &RepId, month: NaiveDate)
        -> Result<MonthToDateCounts, StoreError>;

    fn upsert_month_stats(&self, stats: &RepMonthStats) -> Result<(), StoreError>;

    fn upsert_forecast(&self, forecast: &RepMonthForecast) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("rep {0} not found")]
    RepNotFound(RepId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("write rejected: {0}")]
    WriteRejected(String),
}
