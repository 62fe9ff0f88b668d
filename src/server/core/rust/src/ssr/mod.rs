/* src/server/core/rust/src/ssr/mod.rs */

mod http;

use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use serde::Deserialize;
use tracing::info;

use crate::bundler::Bundler;
use crate::errors::InertiaError;
use crate::page::PageObject;
use crate::producer::{BoxError, BoxFuture};

pub use http::HttpSsrEngine;

/// Server-side rendering output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RenderedPage {
  /// Head tags, one per entry.
  #[serde(default)]
  pub head: Vec<String>,
  pub body: String,
}

pub trait SsrEngine: Send + Sync {
  fn name(&self) -> &str;

  /// Render a page. The returned future must not borrow `page`; engines
  /// serialize it up front.
  fn render(&self, page: &PageObject<'_>) -> BoxFuture<Result<RenderedPage, BoxError>>;
}

pub type SsrFactory =
  Arc<dyn Fn() -> BoxFuture<Result<Arc<dyn SsrEngine>, BoxError>> + Send + Sync>;

/// Wrap an async constructor as an [`SsrFactory`].
pub fn ssr_factory<F, Fut>(f: F) -> SsrFactory
where
  F: Fn() -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Arc<dyn SsrEngine>, BoxError>> + Send + 'static,
{
  Arc::new(move || -> BoxFuture<Result<Arc<dyn SsrEngine>, BoxError>> { Box::pin(f()) })
}

/// Lazily started SSR engine shared by all renders. The engine is built on
/// first use, at most once at a time; a failed start is retried by the next
/// render.
pub struct SsrCell {
  slot: RwLock<Option<Arc<dyn SsrEngine>>>,
  init: tokio::sync::Mutex<()>,
  factory: SsrFactory,
  bundler: Arc<dyn Bundler>,
}

impl SsrCell {
  pub fn new(factory: SsrFactory, bundler: Arc<dyn Bundler>) -> Self {
    Self { slot: RwLock::new(None), init: tokio::sync::Mutex::new(()), factory, bundler }
  }

  fn cached(&self) -> Option<Arc<dyn SsrEngine>> {
    self.slot.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn is_started(&self) -> bool {
    self.cached().is_some()
  }

  pub async fn get(&self) -> Result<Arc<dyn SsrEngine>, InertiaError> {
    if let Some(engine) = self.cached() {
      return Ok(engine);
    }
    let _init = self.init.lock().await;
    if let Some(engine) = self.cached() {
      return Ok(engine);
    }

    info!("starting ssr engine");
    let started = Instant::now();
    let dev = if self.bundler.is_dev() { self.bundler.dev_ssr_engine() } else { None };
    let engine = match dev {
      Some(result) => {
        let engine = result.map_err(InertiaError::SsrStart)?;
        info!(engine = engine.name(), "dev mode enabled, using bundler ssr engine");
        engine
      }
      None => {
        let engine = (self.factory)().await.map_err(InertiaError::SsrStart)?;
        info!(engine = engine.name(), dur = ?started.elapsed(), "ssr engine started");
        engine
      }
    };

    *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&engine));
    Ok(engine)
  }
}

impl fmt::Debug for SsrCell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SsrCell").field("started", &self.is_started()).finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests;
