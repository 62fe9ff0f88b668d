/* src/server/core/rust/src/producer.rs */

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Context handed to every prop producer.
#[derive(Debug, Clone)]
pub struct PropCtx {
  component: Arc<str>,
  partial: bool,
  deadline: Option<Instant>,
}

impl PropCtx {
  pub fn new(component: &str, partial: bool, deadline: Option<Instant>) -> Self {
    Self { component: Arc::from(component), partial, deadline }
  }

  pub fn component(&self) -> &str {
    &self.component
  }

  pub fn is_partial(&self) -> bool {
    self.partial
  }

  /// Caller-supplied deadline. Producers may honor it; the engine itself
  /// imposes no timeout.
  pub fn deadline(&self) -> Option<Instant> {
    self.deadline
  }
}

pub type PropFn = Arc<dyn Fn(PropCtx) -> BoxFuture<Result<Value, BoxError>> + Send + Sync>;

/// Wrap an async closure returning any serializable value as a [`PropFn`].
pub(crate) fn producer<F, Fut, T, E>(f: F) -> PropFn
where
  F: Fn(PropCtx) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<T, E>> + Send + 'static,
  T: Serialize + 'static,
  E: Into<BoxError> + 'static,
{
  Arc::new(move |ctx: PropCtx| -> BoxFuture<Result<Value, BoxError>> {
    let fut = f(ctx);
    Box::pin(async move {
      let value = fut.await.map_err(Into::<BoxError>::into)?;
      serde_json::to_value(value).map_err(BoxError::from)
    })
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn producer_serializes_output() {
    let f = producer(|ctx: PropCtx| async move {
      Ok::<_, BoxError>(vec![ctx.component().to_string(), ctx.is_partial().to_string()])
    });
    let value = f(PropCtx::new("Home", true, None)).await.unwrap();
    assert_eq!(value, serde_json::json!(["Home", "true"]));
  }

  #[tokio::test]
  async fn producer_propagates_error() {
    let f = producer(|_| async { Err::<u32, _>(std::io::Error::other("db down")) });
    let err = f(PropCtx::new("Home", false, None)).await.unwrap_err();
    assert_eq!(err.to_string(), "db down");
  }
}
