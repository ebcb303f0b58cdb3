use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

/// Envelope of every JSON response: `{status, message, data}`.
#[derive(Debug, Serialize)]
pub struct JsonApiResponse<T: Serialize> {
    pub status: u16,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> JsonApiResponse<T> {
    pub fn ok(data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::OK, "ok", data)
    }

    pub fn created(data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::CREATED, "created", data)
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> ApiResult<T> {
        Ok(Self {
            status: status.as_u16(),
            message: message.into(),
            data,
        })
    }
}

impl JsonApiResponse<serde_json::Value> {
    /// Validation errors carry their `{field: message}` map as `data`.
    pub(crate) fn from_error(err: &AppError) -> Self {
        let status = status_for(err);
        let data = err
            .field_errors()
            .and_then(|errors| serde_json::to_value(errors).ok())
            .unwrap_or(serde_json::Value::Null);
        Self {
            status: status.as_u16(),
            message: err.message().to_string(),
            data,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            log_app_error(&self, status);
        }
        JsonApiResponse::from_error(&self).into_response()
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub(crate) fn log_app_error(err: &AppError, status: StatusCode) {
    tracing::error!(status = status.as_u16(), error = %err, "request failed");
}

pub(crate) fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use axum::{body, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::error::AppError;

    use super::{JsonApiResponse, status_for};

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn error_variants_map_to_statuses() {
        assert_eq!(
            status_for(&AppError::validation("user", "x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&AppError::bad_request("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&AppError::unauthorized("x")), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&AppError::forbidden("x")), StatusCode::FORBIDDEN);
        assert_eq!(status_for(&AppError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&AppError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&AppError::internal("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn validation_error_body_carries_field_map() {
        let response = AppError::validation("error", "Passwords don't match").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert_eq!(
            body_json(response).await,
            json!({
                "status": 400,
                "message": "Passwords don't match",
                "data": { "error": "Passwords don't match" },
            })
        );
    }

    #[tokio::test]
    async fn created_uses_201() {
        let response = JsonApiResponse::created(json!({ "id": 1 }))
            .expect("response")
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["data"]["id"], 1);
    }
}
