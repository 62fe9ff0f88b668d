/* src/server/adapter/axum/src/response.rs */

use axum::Json;
use axum::http::header::{CONTENT_TYPE, LOCATION, SET_COOKIE, VARY};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use inertia_core::headers::{PRECOGNITION, PRECOGNITION_SUCCESS, X_INERTIA, X_INERTIA_LOCATION};
use inertia_core::precognition::{
  PRECOGNITION_ERROR_STATUS, PRECOGNITION_SUCCESS_STATUS, error_body, is_precognition,
  nest_error_bag,
};
use inertia_core::redirect::{CONFLICT, FOUND, back_url, redirect_status};
use inertia_core::session::{ERRORS_KEY, generate_session_id};
use inertia_core::{InertiaError, Props, RenderOptions, Rendered};
use serde_json::{Map, Value};
use tracing::debug;

use crate::cookie;
use crate::error::AxumError;
use crate::request::InertiaRequest;

fn status(code: u16) -> StatusCode {
  StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn render(
  req: &InertiaRequest,
  component: &str,
  props: Props,
) -> Result<Response, AxumError> {
  render_with(req, component, props, RenderOptions::new()).await
}

/// Protocol visits get the page object as JSON, first visits a document.
pub async fn render_with(
  req: &InertiaRequest,
  component: &str,
  props: Props,
  options: RenderOptions,
) -> Result<Response, AxumError> {
  let response = match req.inertia.render(&req.page, component, props, options).await? {
    Rendered::Json(json) => (
      [
        (X_INERTIA, "true"),
        (VARY.as_str(), X_INERTIA),
        (CONTENT_TYPE.as_str(), "application/json"),
      ],
      json,
    )
      .into_response(),
    Rendered::Html(html) => {
      ([(CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response()
    }
  };
  Ok(response)
}

/// 303 after PUT/PATCH/DELETE so the browser follows with a GET, 302 otherwise.
pub fn redirect(req: &InertiaRequest, url: &str) -> Response {
  (status(redirect_status(req.method.as_str())), [(LOCATION, url)]).into_response()
}

/// Redirect to the `Referer`, or `/` without one.
pub fn redirect_back(req: &InertiaRequest) -> Response {
  redirect(req, back_url(&req.page.signals))
}

/// Full browser navigation, e.g. to another site. Protocol visits get a 409
/// the client turns into `window.location`.
pub fn location(req: &InertiaRequest, url: &str) -> Response {
  if req.is_inertia() {
    (status(CONFLICT), [(X_INERTIA_LOCATION, url)]).into_response()
  } else {
    (status(FOUND), [(LOCATION, url)]).into_response()
  }
}

pub fn precognition_success() -> Response {
  (
    status(PRECOGNITION_SUCCESS_STATUS),
    [(VARY.as_str(), PRECOGNITION), (PRECOGNITION, "true"), (PRECOGNITION_SUCCESS, "true")],
  )
    .into_response()
}

pub fn precognition_error(errors: Map<String, Value>) -> Response {
  (
    status(PRECOGNITION_ERROR_STATUS),
    [(VARY.as_str(), PRECOGNITION), (PRECOGNITION, "true")],
    Json(error_body(errors)),
  )
    .into_response()
}

/// Answer a form submission that failed validation.
///
/// With no errors there is nothing to send unless the request is a
/// precognition probe, which gets a 204. Otherwise errors are nested under
/// the request's error bag and either returned as a 422 (precognition) or
/// flashed to the session followed by a redirect back to the form.
pub fn render_errors(
  req: &InertiaRequest,
  errors: Map<String, Value>,
) -> Result<Option<Response>, AxumError> {
  let signals = &req.page.signals;
  if errors.is_empty() {
    return Ok(is_precognition(signals).then(precognition_success));
  }

  let errors = nest_error_bag(errors, signals.error_bag.as_deref());
  if is_precognition(signals) {
    return Ok(Some(precognition_error(errors)));
  }

  let (session_id, fresh) = match &req.session_id {
    Some(id) => (id.clone(), false),
    None => (generate_session_id(), true),
  };
  debug!(count = errors.len(), fresh_session = fresh, "flashing validation errors");
  req
    .inertia
    .session()
    .flash(&session_id, ERRORS_KEY, Value::Object(errors))
    .map_err(InertiaError::from)?;

  let mut response = redirect_back(req);
  if fresh {
    let set = cookie::session(req.inertia.session_cookie(), &session_id);
    if let Ok(value) = HeaderValue::from_str(&set) {
      response.headers_mut().append(SET_COOKIE, value);
    }
  }
  Ok(Some(response))
}
