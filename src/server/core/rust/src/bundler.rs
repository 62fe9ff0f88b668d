/* src/server/core/rust/src/bundler.rs */

use std::sync::Arc;

use inertia_engine::TemplateFunctions;

use crate::producer::BoxError;
use crate::ssr::SsrEngine;

/// Asset bundler integration.
pub trait Bundler: Send + Sync {
  /// Functions callable from the root template, e.g. `{{ vite "app.ts" }}`.
  fn template_functions(&self) -> TemplateFunctions;

  fn is_dev(&self) -> bool;

  /// SSR engine served by the bundler's dev server. Used instead of the
  /// configured factory while [`Bundler::is_dev`] is true.
  fn dev_ssr_engine(&self) -> Option<Result<Arc<dyn SsrEngine>, BoxError>> {
    None
  }
}

/// Bundler for apps whose root template references assets directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBundler;

impl Bundler for NoBundler {
  fn template_functions(&self) -> TemplateFunctions {
    TemplateFunctions::new()
  }

  fn is_dev(&self) -> bool {
    false
  }
}
