/* src/server/adapter/axum/src/csrf.rs */

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use inertia_core::CsrfConfig;
use inertia_core::csrf::{CSRF_COOKIE, CSRF_HEADER, CSRF_MISMATCH_STATUS, generate_token, verify};
use tracing::warn;

use crate::cookie;

pub(crate) async fn csrf_middleware(
  State(config): State<CsrfConfig>,
  req: Request,
  next: Next,
) -> Response {
  let token = cookie::get(req.headers(), CSRF_COOKIE).map(str::to_string);
  let header = req.headers().get(CSRF_HEADER).and_then(|v| v.to_str().ok());
  if !verify(req.method().as_str(), token.as_deref(), header) {
    warn!(method = %req.method(), uri = %req.uri(), "csrf token mismatch");
    let status = StatusCode::from_u16(CSRF_MISMATCH_STATUS).unwrap_or(StatusCode::FORBIDDEN);
    return (status, "CSRF token mismatch").into_response();
  }

  let mut response = next.run(req).await;
  if token.is_none() {
    let fresh = cookie::csrf(&generate_token(), config);
    if let Ok(value) = HeaderValue::from_str(&fresh) {
      response.headers_mut().append(SET_COOKIE, value);
    }
  }
  response
}
