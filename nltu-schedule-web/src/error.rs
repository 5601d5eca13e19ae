use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ApiError {
  code: &'static str,
  message: String,
}

#[derive(Debug)]
pub enum AppError {
  BadRequest(String),
}

impl AppError {
  pub fn bad_request(err: impl std::fmt::Display) -> Self {
    AppError::BadRequest(err.to_string())
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let (status, error) = match self {
      AppError::BadRequest(message) => (
        StatusCode::BAD_REQUEST,
        ApiError {
          code: "BAD_REQUEST",
          message,
        },
      ),
    };

    (status, Json(error)).into_response()
  }
}
