/* src/server/core/rust/src/ssr/tests.rs */

use std::sync::atomic::{AtomicUsize, Ordering};

use inertia_engine::TemplateFunctions;

use super::*;
use crate::bundler::NoBundler;

struct Named(&'static str);

impl SsrEngine for Named {
  fn name(&self) -> &str {
    self.0
  }

  fn render(&self, page: &PageObject<'_>) -> BoxFuture<Result<RenderedPage, BoxError>> {
    let body = format!("<main>{}</main>", page.component);
    Box::pin(async move { Ok::<_, BoxError>(RenderedPage { head: Vec::new(), body }) })
  }
}

struct DevBundler {
  dev: bool,
}

impl Bundler for DevBundler {
  fn template_functions(&self) -> TemplateFunctions {
    TemplateFunctions::new()
  }

  fn is_dev(&self) -> bool {
    self.dev
  }

  fn dev_ssr_engine(&self) -> Option<Result<Arc<dyn SsrEngine>, BoxError>> {
    Some(Ok(Arc::new(Named("dev"))))
  }
}

fn counting_factory(calls: Arc<AtomicUsize>, fail_first: bool) -> SsrFactory {
  ssr_factory(move || {
    let calls = Arc::clone(&calls);
    async move {
      let n = calls.fetch_add(1, Ordering::SeqCst);
      tokio::time::sleep(std::time::Duration::from_millis(10)).await;
      if fail_first && n == 0 {
        return Err::<Arc<dyn SsrEngine>, BoxError>("node not found".into());
      }
      Ok(Arc::new(Named("factory")) as Arc<dyn SsrEngine>)
    }
  })
}

#[tokio::test]
async fn concurrent_first_use_builds_once() {
  let calls = Arc::new(AtomicUsize::new(0));
  let factory = counting_factory(Arc::clone(&calls), false);
  let cell = Arc::new(SsrCell::new(factory, Arc::new(NoBundler)));

  let mut tasks = tokio::task::JoinSet::new();
  for _ in 0..8 {
    let cell = Arc::clone(&cell);
    tasks.spawn(async move { cell.get().await.map(|e| e.name().to_string()) });
  }
  while let Some(joined) = tasks.join_next().await {
    assert_eq!(joined.unwrap().unwrap(), "factory");
  }
  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert!(cell.is_started());
}

#[tokio::test]
async fn failed_start_is_retried() {
  let calls = Arc::new(AtomicUsize::new(0));
  let cell = SsrCell::new(counting_factory(Arc::clone(&calls), true), Arc::new(NoBundler));

  let err = cell.get().await.err().unwrap();
  assert!(matches!(err, InertiaError::SsrStart(_)));
  assert!(!cell.is_started());

  let engine = cell.get().await.unwrap();
  assert_eq!(engine.name(), "factory");
  assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn dev_bundler_engine_wins_in_dev_mode() {
  let calls = Arc::new(AtomicUsize::new(0));
  let cell =
    SsrCell::new(counting_factory(Arc::clone(&calls), false), Arc::new(DevBundler { dev: true }));
  assert_eq!(cell.get().await.unwrap().name(), "dev");
  assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn factory_used_outside_dev_mode() {
  let calls = Arc::new(AtomicUsize::new(0));
  let cell =
    SsrCell::new(counting_factory(Arc::clone(&calls), false), Arc::new(DevBundler { dev: false }));
  assert_eq!(cell.get().await.unwrap().name(), "factory");
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}
