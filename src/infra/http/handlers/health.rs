use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use rubrica_api_types::HealthStatus;

use crate::application::health::health_report;
use crate::infra::http::AppState;

/// Probes Postgres and Redis. Only a fully dark backend turns into a 503;
/// a degraded service still answers so orchestrators keep routing traffic.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let report = health_report(state.db.as_ref(), state.cache.as_deref()).await;
    let status = match report.status {
        HealthStatus::Ok | HealthStatus::Partial => StatusCode::OK,
        HealthStatus::Error => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(report))
}
