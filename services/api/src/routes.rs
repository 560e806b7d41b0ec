use std::collections::BTreeMap;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use salesfloor::analytics::{
    AnalyticsParams, PerformanceAnalyzer, RepAnalysis, RepId, RepPeriodStats,
};
use salesfloor::forecast::{MonthToDateCounts, RecomputeInput, RecomputeResult};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::infra::{AppState, ForecastState};

#[derive(Debug, Deserialize)]
pub(crate) struct PerformanceRequest {
    pub(crate) reps: Vec<RepPeriodStats>,
    /// Partial overrides; omitted fields keep the documented defaults.
    #[serde(default)]
    pub(crate) params: AnalyticsParams,
}

#[derive(Debug, Serialize)]
pub(crate) struct PerformanceResponse {
    pub(crate) reps: BTreeMap<RepId, RepAnalysis>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecomputeRequest {
    pub(crate) rep_id: RepId,
    pub(crate) quota_units: u32,
    #[serde(default)]
    pub(crate) month: Option<NaiveDate>,
    /// Reference date for pacing; defaults to the server's local date.
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MonthActivityRequest {
    pub(crate) rep_id: RepId,
    pub(crate) month: NaiveDate,
    #[serde(flatten)]
    pub(crate) counts: MonthToDateCounts,
}

pub(crate) fn api_router(forecast: ForecastState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/analytics/performance",
            post(performance_endpoint),
        )
        .route(
            "/api/v1/forecast/activity",
            post(record_activity_endpoint),
        )
        .route(
            "/api/v1/forecast/recompute",
            post(forecast_recompute_endpoint),
        )
        .layer(Extension(forecast))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Run the full analytics pipeline over the posted snapshot. Pure request
/// handling: nothing is persisted, so concurrent renders never contend.
pub(crate) async fn performance_endpoint(
    Json(payload): Json<PerformanceRequest>,
) -> Json<PerformanceResponse> {
    let PerformanceRequest { reps, params } = payload;
    let analyzer = PerformanceAnalyzer::new(params);
    Json(PerformanceResponse {
        reps: analyzer.analyze(&reps),
    })
}

/// Collaborator hand-off: upsert a rep's month-to-date aggregates.
pub(crate) async fn record_activity_endpoint(
    Extension(forecast): Extension<ForecastState>,
    Json(payload): Json<MonthActivityRequest>,
) -> StatusCode {
    let MonthActivityRequest {
        rep_id,
        month,
        counts,
    } = payload;
    forecast
        .store
        .record_activity(rep_id, salesfloor::forecast::month_start(month), counts);
    StatusCode::NO_CONTENT
}

/// Recompute and persist one rep's month forecast. A store failure surfaces
/// as JSON `null`, mirroring the engine's non-fatal contract.
pub(crate) async fn forecast_recompute_endpoint(
    Extension(forecast): Extension<ForecastState>,
    Json(payload): Json<RecomputeRequest>,
) -> Json<Option<RecomputeResult>> {
    let RecomputeRequest {
        rep_id,
        quota_units,
        month,
        today,
    } = payload;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let input = RecomputeInput {
        rep_id,
        quota_units,
        month,
    };
    Json(forecast.service.recompute(&input, today))
}
