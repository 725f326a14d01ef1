use crate::dtos::{HealthChecks, HealthResponse};
use crate::AppState;
use axum::{extract::State, Json};
use service_core::error::AppError;

#[utoipa::path(
    get,
    path = "/health",
    tag = "Observability",
    responses(
        (status = 200, description = "Database and cache are reachable", body = HealthResponse),
        (status = 503, description = "A dependency is down", body = ErrorResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    if let Err(e) = state.db.health_check().await {
        tracing::error!(error = %e, "Database health check failed");
        return Err(AppError::ServiceUnavailable(format!(
            "Database unavailable: {}",
            e
        )));
    }

    if let Err(e) = state.cache.health_check().await {
        tracing::error!(error = %e, "Cache health check failed");
        return Err(AppError::ServiceUnavailable(format!(
            "Cache unavailable: {}",
            e
        )));
    }

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            postgresql: "up".to_string(),
            redis: "up".to_string(),
        },
    }))
}
