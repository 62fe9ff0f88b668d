/* src/server/core/rust/src/process/tests.rs */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;

use super::*;
use crate::headers::RequestSignals;
use crate::producer::BoxError;

fn full_load() -> RequestSignals {
  RequestSignals::default()
}

fn partial(component: &str, data: &[&str], except: &[&str]) -> RequestSignals {
  RequestSignals {
    inertia: true,
    partial_component: Some(component.to_string()),
    partial_data: data.iter().map(ToString::to_string).collect(),
    partial_except: except.iter().map(ToString::to_string).collect(),
    ..RequestSignals::default()
  }
}

async fn run(
  props: Props,
  signals: &RequestSignals,
  flashed: Option<&Map<String, Value>>,
) -> Result<ProcessedProps, InertiaError> {
  let negotiation = signals.negotiate("Page");
  let ctx = PropCtx::new("Page", negotiation.is_partial(), None);
  let mut out = ProcessedProps::default();
  process_props(props, &negotiation, flashed, &ctx, &mut out).await?;
  Ok(out)
}

fn every_kind() -> Props {
  Props::new()
    .with("value", json!("v"))
    .with("always", Prop::always("a"))
    .with("lazy", Prop::lazy(|_| async { Ok::<_, BoxError>("l") }))
    .with("optional", Prop::optional(|_| async { Ok::<_, BoxError>("o") }))
    .with("deferred", Prop::deferred(|_| async { Ok::<_, BoxError>("d") }))
    .with("merge", Prop::merge(|_| async { Ok::<_, BoxError>(vec![1]) }))
    .with("scroll", Prop::scroll(|_| async { Ok::<_, BoxError>(vec![1, 2]) }))
    .with("errors", Prop::errors(Map::new()))
}

fn keys(out: &ProcessedProps) -> Vec<&str> {
  out.values().keys().map(String::as_str).collect()
}

#[tokio::test]
async fn full_load_skips_deferred_and_optional() {
  let out = run(every_kind(), &full_load(), None).await.unwrap();
  assert_eq!(keys(&out), vec!["always", "errors", "lazy", "merge", "scroll", "value"]);
  assert_eq!(out.values()["lazy"], json!("l"));
  assert_eq!(out.values()["scroll"], json!({"data": [1, 2]}));
  assert_eq!(out.deferred()["default"], vec!["deferred"]);
}

#[tokio::test]
async fn partial_reload_follows_data_and_except() {
  let signals = partial("Page", &["value", "lazy", "optional", "deferred"], &["lazy"]);
  let out = run(every_kind(), &signals, None).await.unwrap();
  assert_eq!(keys(&out), vec!["always", "deferred", "errors", "optional", "value"]);
  assert!(out.deferred().is_empty());
}

#[tokio::test]
async fn partial_reload_without_data_keeps_default_props() {
  let signals = partial("Page", &[], &["value"]);
  let out = run(every_kind(), &signals, None).await.unwrap();
  assert_eq!(keys(&out), vec!["always", "errors", "lazy", "merge", "scroll"]);
}

#[tokio::test]
async fn partial_for_other_component_is_full_load() {
  let signals = partial("Other", &["value"], &[]);
  let out = run(every_kind(), &signals, None).await.unwrap();
  assert_eq!(keys(&out), vec!["always", "errors", "lazy", "merge", "scroll", "value"]);
}

#[tokio::test]
async fn requested_prop_and_errors_only() {
  let props = Props::new().with("foo", "f").with("baz", "b");
  let out = run(props, &partial("Page", &["foo"], &[]), None).await.unwrap();
  assert_eq!(out.values(), json!({"foo": "f", "errors": {}}).as_object().unwrap());
}

#[tokio::test]
async fn errors_entry_always_present() {
  let out = run(Props::new(), &full_load(), None).await.unwrap();
  assert_eq!(out.values()["errors"], json!({}));
}

#[tokio::test]
async fn excluded_producers_never_run() {
  let ran = Arc::new(AtomicBool::new(false));
  let flag = Arc::clone(&ran);
  let props = Props::new().with(
    "lazy",
    Prop::lazy(move |_| {
      flag.store(true, Ordering::SeqCst);
      async { Ok::<_, BoxError>(1) }
    }),
  );
  run(props, &partial("Page", &["other"], &[]), None).await.unwrap();
  assert!(!ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn deferred_groups() {
  let props = Props::new()
    .with("a", Prop::deferred(|_| async { Ok::<_, BoxError>(1) }))
    .with("b", Prop::deferred(|_| async { Ok::<_, BoxError>(2) }).group("sidebar"))
    .with("c", Prop::deferred(|_| async { Ok::<_, BoxError>(3) }).group("sidebar"));
  let out = run(props, &full_load(), None).await.unwrap();
  assert_eq!(out.deferred()["default"], vec!["a"]);
  assert_eq!(out.deferred()["sidebar"], vec!["b", "c"]);
  assert!(!out.values().contains_key("a"));
}

#[tokio::test]
async fn producer_failure_aborts_render() {
  let props = Props::new()
    .with("ok", Prop::lazy(|_| async { Ok::<_, BoxError>(1) }))
    .with("broken", Prop::lazy(|_| async { Err::<u8, BoxError>("db down".into()) }));
  let err = run(props, &full_load(), None).await.unwrap_err();
  match err {
    InertiaError::Prop { name, source } => {
      assert_eq!(name, "broken");
      assert_eq!(source.to_string(), "db down");
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn failure_cancels_slow_producers() {
  let finished = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&finished);
  let props = Props::new()
    .with(
      "slow",
      Prop::lazy(move |_| {
        let counter = Arc::clone(&counter);
        async move {
          tokio::time::sleep(Duration::from_secs(5)).await;
          counter.fetch_add(1, Ordering::SeqCst);
          Ok::<_, BoxError>(1)
        }
      }),
    )
    .with("broken", Prop::lazy(|_| async { Err::<u8, BoxError>("nope".into()) }));
  assert!(run(props, &full_load(), None).await.is_err());
  tokio::time::sleep(Duration::from_millis(20)).await;
  assert_eq!(finished.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn producers_run_concurrently() {
  let props: Props = (0..4)
    .map(|i| {
      let prop = Prop::lazy(move |_| async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok::<_, BoxError>(i)
      });
      (format!("p{i}"), prop)
    })
    .collect();
  let started = std::time::Instant::now();
  let out = run(props, &full_load(), None).await.unwrap();
  assert!(started.elapsed() < Duration::from_millis(350));
  assert_eq!(out.values()["p3"], json!(3));
}

#[tokio::test]
async fn producers_see_render_context() {
  let props = Props::new().with(
    "ctx",
    Prop::lazy(|ctx: PropCtx| async move {
      Ok::<_, BoxError>(json!({"component": ctx.component(), "partial": ctx.is_partial()}))
    }),
  );
  let out = run(props, &partial("Page", &["ctx"], &[]), None).await.unwrap();
  assert_eq!(out.values()["ctx"], json!({"component": "Page", "partial": true}));
}

mod errors {
  use super::*;

  fn map(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
  }

  #[tokio::test]
  async fn flashed_errors_fill_missing_prop() {
    let flashed = map(json!({"email": "required"}));
    let out = run(Props::new(), &full_load(), Some(&flashed)).await.unwrap();
    assert_eq!(out.values()["errors"], json!({"email": "required"}));
  }

  #[tokio::test]
  async fn flashed_errors_deep_merge_over_handler_errors() {
    let props = Props::new()
      .with("errors", Prop::errors(map(json!({"login": {"email": "taken", "name": "short"}}))));
    let flashed = map(json!({"login": {"email": "required"}, "password": "weak"}));
    let out = run(props, &full_load(), Some(&flashed)).await.unwrap();
    assert_eq!(
      out.values()["errors"],
      json!({"login": {"email": "required", "name": "short"}, "password": "weak"})
    );
  }

  #[tokio::test]
  async fn flashed_errors_replace_non_error_prop() {
    let props = Props::new().with("errors", "not a map");
    let flashed = map(json!({"email": "required"}));
    let out = run(props, &full_load(), Some(&flashed)).await.unwrap();
    assert_eq!(out.values()["errors"], json!({"email": "required"}));
  }

  #[tokio::test]
  async fn handler_errors_kept_without_flash() {
    let props = Props::new().with("errors", Prop::errors(map(json!({"name": "short"}))));
    let out = run(props, &full_load(), None).await.unwrap();
    assert_eq!(out.values()["errors"], json!({"name": "short"}));
  }

  #[test]
  fn deep_merge_replaces_scalars_and_recurses_objects() {
    let mut dst = map(json!({"a": {"x": 1, "y": 2}, "b": 1}));
    deep_merge(&mut dst, &map(json!({"a": {"y": 3}, "b": {"z": 4}})));
    assert_eq!(Value::Object(dst), json!({"a": {"x": 1, "y": 3}, "b": {"z": 4}}));
  }
}
