/* src/server/adapter/axum/src/lib.rs */

mod cookie;
mod csrf;
mod error;
mod middleware;
mod request;
mod response;

use axum::Router;
use axum::middleware::from_fn_with_state;
use inertia_core::Inertia;

/// Re-export inertia-core for convenience
pub use inertia_core;
pub use inertia_core::HttpSsrEngine;

pub use error::AxumError;
pub use request::InertiaRequest;
pub use response::{
  location, precognition_error, precognition_success, redirect, redirect_back, render,
  render_errors, render_with,
};

/// Extension trait that installs the page protocol layers on an Axum router.
pub trait InertiaExt {
  /// Asset version checks and flashed error loading. Required by
  /// [`InertiaRequest`].
  fn middleware(self, inertia: Inertia) -> Self;

  /// Double-submit CSRF protection; a no-op unless the builder enabled it.
  fn csrf_layer(self, inertia: &Inertia) -> Self;
}

impl<S> InertiaExt for Router<S>
where
  S: Clone + Send + Sync + 'static,
{
  fn middleware(self, inertia: Inertia) -> Self {
    self.layer(from_fn_with_state(inertia, middleware::inertia_middleware))
  }

  fn csrf_layer(self, inertia: &Inertia) -> Self {
    match inertia.csrf() {
      Some(config) => self.layer(from_fn_with_state(config, csrf::csrf_middleware)),
      None => self,
    }
  }
}
