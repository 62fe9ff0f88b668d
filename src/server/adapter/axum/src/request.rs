/* src/server/adapter/axum/src/request.rs */

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap, Method, Uri};
use inertia_core::{Inertia, InertiaError, PageRequest, Prop, RequestSignals, RequestState};

use crate::cookie;
use crate::error::AxumError;

pub(crate) fn signals(headers: &HeaderMap) -> RequestSignals {
  RequestSignals::parse(|name| headers.get(name).and_then(|v| v.to_str().ok()))
}

/// The URI the client sent, before any `Router::nest` prefix was stripped.
pub(crate) fn original_uri<'a>(uri: &'a Uri, extensions: &'a Extensions) -> &'a Uri {
  extensions.get::<OriginalUri>().map_or(uri, |original| &original.0)
}

/// Extractor handing a handler everything it needs to answer with a page,
/// a redirect or validation errors. Requires [`crate::InertiaExt::middleware`].
#[derive(Clone)]
pub struct InertiaRequest {
  pub(crate) inertia: Inertia,
  pub(crate) method: Method,
  pub(crate) page: PageRequest,
  pub(crate) session_id: Option<String>,
}

impl InertiaRequest {
  pub fn inertia(&self) -> &Inertia {
    &self.inertia
  }

  pub fn method(&self) -> &Method {
    &self.method
  }

  pub fn signals(&self) -> &RequestSignals {
    &self.page.signals
  }

  pub fn is_inertia(&self) -> bool {
    self.page.signals.inertia
  }

  /// Share a prop with every page rendered for this request.
  pub fn share(&mut self, name: impl Into<String>, prop: impl Into<Prop>) {
    self.page.state.share(name, prop);
  }
}

impl<S> FromRequestParts<S> for InertiaRequest
where
  S: Send + Sync,
{
  type Rejection = AxumError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let inertia = parts.extensions.get::<Inertia>().cloned().ok_or_else(|| {
      InertiaError::Config("InertiaRequest used on a router without the inertia middleware".into())
    })?;
    let state = parts.extensions.get::<RequestState>().cloned().unwrap_or_default();
    let session_id = cookie::get(&parts.headers, inertia.session_cookie()).map(str::to_string);
    let url = original_uri(&parts.uri, &parts.extensions).path();
    let page = PageRequest::new(url, signals(&parts.headers)).with_state(state);
    Ok(Self { inertia, method: parts.method.clone(), page, session_id })
  }
}
