use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Uniform error body for every router. Server-side failures are masked so
/// internal detail never leaks to clients; the detail lives in the logs.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let message = if status.is_server_error() {
        "Internal server error".to_string()
    } else {
        message.into()
    };

    let body = Json(ErrorResponse {
        code: status.as_u16(),
        message,
    });

    (status, body).into_response()
}
