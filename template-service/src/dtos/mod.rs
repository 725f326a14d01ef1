//! Response bodies as they appear in the OpenAPI document.
//!
//! Handlers build responses through `service_core::response::ApiResponse`;
//! these concrete types exist so the generated docs show the envelope.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PingData {
    #[schema(example = "pong")]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PingResponse {
    #[schema(example = 0)]
    pub code: i32,
    pub data: PingData,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageData {
    #[schema(example = "Service unavailable")]
    pub msg: String,
    #[schema(example = "服务不可用")]
    pub msg_zh: String,
}

/// Envelope returned for every error.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = -1)]
    pub code: i32,
    pub data: MessageData,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthChecks {
    #[schema(example = "up")]
    pub postgresql: String,
    #[schema(example = "up")]
    pub redis: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "template-service")]
    pub service: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    pub checks: HealthChecks,
}
