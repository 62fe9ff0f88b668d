/* src/server/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inertia_core::InertiaError;
use tracing::error;

/// Newtype wrapper to implement `IntoResponse` for `InertiaError`.
/// Clients get a bare 500; details go to the log only.
#[derive(Debug)]
pub struct AxumError(pub InertiaError);

impl IntoResponse for AxumError {
  fn into_response(self) -> Response {
    let err = self.0;
    error!(code = err.code(), "request failed: {err}");
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, "Internal Server Error").into_response()
  }
}

impl From<InertiaError> for AxumError {
  fn from(err: InertiaError) -> Self {
    Self(err)
  }
}
