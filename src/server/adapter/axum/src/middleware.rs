/* src/server/adapter/axum/src/middleware.rs */

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use inertia_core::headers::X_INERTIA_LOCATION;
use inertia_core::session::ERRORS_KEY;
use inertia_core::{Inertia, InertiaError, RequestState};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cookie;
use crate::error::AxumError;
use crate::request::{original_uri, signals};

/// Reject stale protocol visits, load flashed errors, and expose the
/// server state to [`crate::InertiaRequest`].
pub(crate) async fn inertia_middleware(
  State(inertia): State<Inertia>,
  mut req: Request,
  next: Next,
) -> Response {
  let signals = signals(req.headers());
  if inertia.is_version_conflict(req.method().as_str(), &signals) {
    let uri = original_uri(req.uri(), req.extensions()).to_string();
    warn!(
      uri = %uri,
      client = signals.version.as_deref().unwrap_or_default(),
      server = inertia.version(),
      "asset version conflict"
    );
    return version_conflict(uri);
  }

  let mut state = req.extensions_mut().remove::<RequestState>().unwrap_or_default();
  if let Some(id) = cookie::get(req.headers(), inertia.session_cookie()) {
    match inertia.session().get(id, ERRORS_KEY) {
      Ok(Some(Value::Object(errors))) => {
        debug!(count = errors.len(), "loaded flashed errors");
        state.set_flashed_errors(errors);
      }
      Ok(_) => {}
      Err(e) => return AxumError(InertiaError::from(e)).into_response(),
    }
  }

  req.extensions_mut().insert(state);
  req.extensions_mut().insert(inertia);
  next.run(req).await
}

fn version_conflict(uri: String) -> Response {
  (StatusCode::CONFLICT, [(X_INERTIA_LOCATION, uri)]).into_response()
}
