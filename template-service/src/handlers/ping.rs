use crate::dtos::PingData;
use crate::AppState;
use axum::{extract::State, Json};
use service_core::response::ApiResponse;

/// Example endpoint.
///
/// The state carries the database and cache so new handlers can follow the
/// same wiring; ping itself touches neither.
#[utoipa::path(
    get,
    path = "/ping",
    tag = "Example",
    responses(
        (status = 200, description = "Service is reachable", body = PingResponse)
    )
)]
pub async fn ping(State(_state): State<AppState>) -> Json<ApiResponse<PingData>> {
    Json(ApiResponse::success(PingData {
        message: "pong".to_string(),
    }))
}
