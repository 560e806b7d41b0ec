use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use salesfloor::analytics::RepId;
use salesfloor::forecast::{
    ForecastService, ForecastStore, MonthToDateCounts, RepMonthForecast, RepMonthStats, StoreError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Forecast collaborators shared by the routes: the in-memory store and the
/// service computing over it.
#[derive(Clone)]
pub(crate) struct ForecastState {
    pub(crate) store: Arc<InMemoryForecastStore>,
    pub(crate) service: Arc<ForecastService<InMemoryForecastStore>>,
}

impl ForecastState {
    pub(crate) fn new() -> Self {
        let store = Arc::new(InMemoryForecastStore::default());
        let service = Arc::new(ForecastService::new(store.clone()));
        Self { store, service }
    }
}

type Key = (RepId, NaiveDate);

/// Keeps month aggregates and forecast rows in process memory. Stands in for
/// the dashboard's database while exercising the engine end to end.
#[derive(Default)]
pub(crate) struct InMemoryForecastStore {
    activity: Mutex<HashMap<Key, MonthToDateCounts>>,
    stats: Mutex<HashMap<Key, RepMonthStats>>,
    forecasts: Mutex<HashMap<Key, RepMonthForecast>>,
}

impl InMemoryForecastStore {
    pub(crate) fn record_activity(
        &self,
        rep_id: RepId,
        month: NaiveDate,
        counts: MonthToDateCounts,
    ) {
        self.activity
            .lock()
            .expect("activity mutex poisoned")
            .insert((rep_id, month), counts);
    }

    pub(crate) fn forecast(&self, rep_id: &RepId, month: NaiveDate) -> Option<RepMonthForecast> {
        self.forecasts
            .lock()
            .expect("forecast mutex poisoned")
            .get(&(rep_id.clone(), month))
            .cloned()
    }
}

impl ForecastStore for InMemoryForecastStore {
    fn month_to_date(
        &self,
        rep_id: &RepId,
        month: NaiveDate,
    ) -> Result<MonthToDateCounts, StoreError> {
        // A rep with no recorded activity is a quiet month, not an error.
        Ok(self
            .activity
            .lock()
            .expect("activity mutex poisoned")
            .get(&(rep_id.clone(), month))
            .copied()
            .unwrap_or_default())
    }

    fn upsert_month_stats(&self, stats: &RepMonthStats) -> Result<(), StoreError> {
        self.stats
            .lock()
            .expect("stats mutex poisoned")
            .insert((stats.rep_id.clone(), stats.month), stats.clone());
        Ok(())
    }

    fn upsert_forecast(&self, forecast: &RepMonthForecast) -> Result<(), StoreError> {
        self.forecasts
            .lock()
            .expect("forecast mutex poisoned")
            .insert((forecast.rep_id.clone(), forecast.month), forecast.clone());
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
