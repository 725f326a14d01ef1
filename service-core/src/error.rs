use crate::response::{ApiResponse, CODE_ERROR, CODE_UNAUTHORIZED};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_)
            | AppError::DatabaseError(_)
            | AppError::RedisError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (code, msg, msg_zh) = match &self {
            AppError::ValidationError(err) => (CODE_ERROR, err.to_string(), "请求参数校验失败"),
            AppError::BadRequest(err) => (CODE_ERROR, err.to_string(), "请求参数错误"),
            AppError::NotFound(err) => (CODE_ERROR, err.to_string(), "资源不存在"),
            AppError::Unauthorized(err) => (CODE_UNAUTHORIZED, err.to_string(), "未授权"),
            AppError::ServiceUnavailable(_) => {
                (CODE_ERROR, "Service unavailable".to_string(), "服务不可用")
            }
            AppError::InternalError(_) => {
                (CODE_ERROR, "Internal server error".to_string(), "服务器内部错误")
            }
            AppError::DatabaseError(_) => (CODE_ERROR, "Database error".to_string(), "数据库错误"),
            AppError::RedisError(_) => (CODE_ERROR, "Cache error".to_string(), "缓存错误"),
            AppError::ConfigError(_) => {
                (CODE_ERROR, "Configuration error".to_string(), "配置错误")
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }

        (status, Json(ApiResponse::message(code, msg, msg_zh))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::MessageBody;

    async fn render(err: AppError) -> (StatusCode, ApiResponse<MessageBody>) {
        let res = err.into_response();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn not_found_keeps_message() {
        let (status, body) = render(AppError::NotFound(anyhow::anyhow!("key 'a' not found"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, CODE_ERROR);
        assert_eq!(body.data.msg, "key 'a' not found");
    }

    #[tokio::test]
    async fn unauthorized_uses_its_own_code() {
        let (status, body) = render(AppError::Unauthorized(anyhow::anyhow!("missing token"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.code, CODE_UNAUTHORIZED);
    }

    #[tokio::test]
    async fn database_error_hides_cause() {
        let (status, body) =
            render(AppError::DatabaseError(anyhow::anyhow!("password authentication failed"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.data.msg, "Database error");
        assert_eq!(body.data.msg_zh, "数据库错误");
    }
}
