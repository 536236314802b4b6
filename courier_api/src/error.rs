use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use courier_matrix::error::{InvalidPoint, MalformedInput};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InternalServerError(String),
}

impl From<MalformedInput> for ApiError {
    fn from(error: MalformedInput) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<InvalidPoint> for ApiError {
    fn from(error: InvalidPoint) -> Self {
        ApiError::BadRequest(format!("Invalid `point`: {error}"))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::InternalServerError(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InternalServerError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
        }
    }
}
