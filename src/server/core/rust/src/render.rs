/* src/server/core/rust/src/render.rs */

use std::time::Instant;

use inertia_engine::{fallback_body, join_head};
use tracing::{debug, error, info};

use crate::errors::InertiaError;
use crate::headers::RequestSignals;
use crate::page::{PageObject, RenderOptions};
use crate::process::process_props;
use crate::producer::PropCtx;
use crate::props::Props;
use crate::server::Inertia;
use crate::state::RequestState;

/// What the renderer needs to know about the incoming request.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
  /// Request path, reported back as the page URL.
  pub url: String,
  pub signals: RequestSignals,
  pub state: RequestState,
}

impl PageRequest {
  pub fn new(url: impl Into<String>, signals: RequestSignals) -> Self {
    Self { url: url.into(), signals, state: RequestState::default() }
  }

  pub fn with_state(mut self, state: RequestState) -> Self {
    self.state = state;
    self
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
  /// Serialized page object for protocol requests.
  Json(String),
  /// Full HTML document for first visits.
  Html(String),
}

impl Inertia {
  /// Render `component` with `props`: resolve the props, assemble the page
  /// object and emit JSON or a full document depending on the request.
  pub async fn render(
    &self,
    request: &PageRequest,
    component: &str,
    props: Props,
    mut options: RenderOptions,
  ) -> Result<Rendered, InertiaError> {
    let result = self.render_inner(request, component, props, &mut options).await;
    if let Err(e) = &result {
      error!(component, url = %request.url, code = e.code(), "render failed: {e}");
    }
    result
  }

  async fn render_inner(
    &self,
    request: &PageRequest,
    component: &str,
    props: Props,
    options: &mut RenderOptions,
  ) -> Result<Rendered, InertiaError> {
    let negotiation = request.signals.negotiate(component);
    let ctx = PropCtx::new(component, negotiation.is_partial(), options.deadline_at());

    let mut all = self.inner.shared.clone();
    all.extend(request.state.shared().clone());
    all.extend(props);

    let mut processed = self.inner.pool.acquire();
    process_props(all, &negotiation, request.state.flashed_errors(), &ctx, &mut processed).await?;

    options.encrypt_history_or(self.inner.encrypt_history);
    let page =
      PageObject::assemble(component, &request.url, &self.inner.version, &processed, options);

    if negotiation.is_inertia() {
      debug!(component, url = %request.url, partial = negotiation.is_partial(), "rendering json");
      return Ok(Rendered::Json(serde_json::to_string(&page)?));
    }
    self.render_document(&page).await.map(Rendered::Html)
  }

  async fn render_document(&self, page: &PageObject<'_>) -> Result<String, InertiaError> {
    let (head, body) = match &self.inner.ssr {
      Some(cell) => {
        debug!(component = %page.component, url = %page.url, "rendering html with ssr");
        let engine = cell.get().await?;
        let started = Instant::now();
        let rendered = engine
          .render(page)
          .await
          .map_err(|source| InertiaError::Ssr { engine: engine.name().to_string(), source })?;
        info!(engine = engine.name(), dur = ?started.elapsed(), "ssr rendered page");
        (join_head(&rendered.head), rendered.body)
      }
      None => {
        debug!(component = %page.component, url = %page.url, "rendering html");
        (String::new(), fallback_body(&serde_json::to_string(page)?))
      }
    };
    Ok(self.inner.root_template.render(&head, &body))
  }
}
