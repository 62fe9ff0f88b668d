/* src/server/core/rust/src/prop.rs */

use std::fmt;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::headers::{MergeIntent, Negotiation, contains};
use crate::page::{OnceEntry, ScrollEntry};
use crate::pool::ProcessedProps;
use crate::producer::{BoxError, BoxFuture, PropCtx, PropFn, producer};

pub const DEFAULT_DEFERRED_GROUP: &str = "default";
pub const DEFAULT_SCROLL_WRAPPER: &str = "data";
pub const DEFAULT_PAGE_NAME: &str = "page";

/// One named prop. Each kind decides whether it is included in a render,
/// how its value is produced and which page metadata it contributes.
#[derive(Clone)]
pub enum Prop {
  /// Static value, default inclusion rule.
  Value(Value),
  /// Static value included on every request, partial or not.
  Always(Value),
  /// Computed only when included.
  Lazy(PropFn),
  /// Computed only when explicitly requested by a partial reload.
  Optional(PropFn),
  /// Left out of the first load; the client fetches it afterwards.
  Deferred(DeferredProp),
  /// Sent once, then cached client-side.
  Once(OnceProp),
  /// Merged into existing client data instead of replacing it.
  Merge(MergeProp),
  /// Paginated list for infinite scrolling.
  Scroll(ScrollProp),
  /// Validation errors.
  Errors(Map<String, Value>),
}

/// How a prop's value becomes available.
pub enum Resolution {
  Ready(Value),
  Pending(BoxFuture<Result<Value, BoxError>>),
}

impl Prop {
  pub fn value(value: impl Into<Value>) -> Self {
    Self::Value(value.into())
  }

  pub fn always(value: impl Into<Value>) -> Self {
    Self::Always(value.into())
  }

  pub fn lazy<F, Fut, T, E>(f: F) -> Self
  where
    F: Fn(PropCtx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + 'static,
    E: Into<BoxError> + 'static,
  {
    Self::Lazy(producer(f))
  }

  pub fn optional<F, Fut, T, E>(f: F) -> Self
  where
    F: Fn(PropCtx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + 'static,
    E: Into<BoxError> + 'static,
  {
    Self::Optional(producer(f))
  }

  pub fn deferred<F, Fut, T, E>(f: F) -> DeferredProp
  where
    F: Fn(PropCtx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + 'static,
    E: Into<BoxError> + 'static,
  {
    DeferredProp { resolver: producer(f), group: None }
  }

  pub fn once<F, Fut, T, E>(f: F) -> OnceProp
  where
    F: Fn(PropCtx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + 'static,
    E: Into<BoxError> + 'static,
  {
    OnceProp { resolver: producer(f), expires_at: None, fresh: false, alias: None }
  }

  pub fn merge<F, Fut, T, E>(f: F) -> MergeProp
  where
    F: Fn(PropCtx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + 'static,
    E: Into<BoxError> + 'static,
  {
    MergeProp {
      resolver: producer(f),
      append: Vec::new(),
      prepend: Vec::new(),
      match_on: Vec::new(),
      deep: false,
    }
  }

  pub fn scroll<F, Fut, T, E>(f: F) -> ScrollProp
  where
    F: Fn(PropCtx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Serialize + 'static,
    E: Into<BoxError> + 'static,
  {
    ScrollProp {
      resolver: producer(f),
      wrapper: DEFAULT_SCROLL_WRAPPER.to_string(),
      metadata: None,
    }
  }

  pub fn errors(errors: Map<String, Value>) -> Self {
    Self::Errors(errors)
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Self::Value(_) => "value",
      Self::Always(_) => "always",
      Self::Lazy(_) => "lazy",
      Self::Optional(_) => "optional",
      Self::Deferred(_) => "deferred",
      Self::Once(_) => "once",
      Self::Merge(_) => "merge",
      Self::Scroll(_) => "scroll",
      Self::Errors(_) => "errors",
    }
  }

  /// Whether the prop appears in the `props` of this render.
  pub fn should_include(&self, name: &str, negotiation: &Negotiation<'_>) -> bool {
    match self {
      Self::Always(_) => true,
      Self::Optional(_) | Self::Deferred(_) => negotiation.requested(name),
      Self::Once(once) => {
        once.fresh || !contains(negotiation.except_once(), once.alias.as_deref().unwrap_or(name))
      }
      Self::Value(_) | Self::Lazy(_) | Self::Merge(_) | Self::Scroll(_) | Self::Errors(_) => {
        default_include(name, negotiation)
      }
    }
  }

  /// Record the page metadata this prop contributes. `included` is the
  /// result of [`Prop::should_include`] for the same render.
  pub fn annotate(
    &self,
    name: &str,
    negotiation: &Negotiation<'_>,
    included: bool,
    out: &mut ProcessedProps,
  ) {
    match self {
      Self::Deferred(deferred) if !included => {
        let group = deferred.group.as_deref().unwrap_or(DEFAULT_DEFERRED_GROUP);
        out.push_deferred(group, name.to_string());
      }
      Self::Once(once) => {
        let entry = OnceEntry {
          prop: name.to_string(),
          expires_at: once.expires_at,
          alias: once.alias.clone(),
        };
        out.insert_once(name, entry);
      }
      Self::Merge(merge) => merge.annotate(name, out),
      Self::Scroll(scroll) if included => scroll.annotate(name, negotiation, out),
      _ => {}
    }
  }

  /// Turn the prop into its value, consuming it.
  pub fn resolve(self, ctx: PropCtx) -> Resolution {
    match self {
      Self::Value(v) | Self::Always(v) => Resolution::Ready(v),
      Self::Errors(map) => Resolution::Ready(Value::Object(map)),
      Self::Lazy(f) | Self::Optional(f) => Resolution::Pending(f(ctx)),
      Self::Deferred(DeferredProp { resolver, .. })
      | Self::Once(OnceProp { resolver, .. })
      | Self::Merge(MergeProp { resolver, .. }) => Resolution::Pending(resolver(ctx)),
      Self::Scroll(ScrollProp { resolver, wrapper, .. }) => {
        let fut = resolver(ctx);
        Resolution::Pending(Box::pin(async move {
          let items = fut.await?;
          let mut wrapped = Map::new();
          wrapped.insert(wrapper, items);
          Ok::<_, BoxError>(Value::Object(wrapped))
        }))
      }
    }
  }
}

/// Full load: include. Partial reload: include when the include list is
/// empty or names the prop, and the exclude list does not.
fn default_include(name: &str, negotiation: &Negotiation<'_>) -> bool {
  if !negotiation.is_partial() {
    return true;
  }
  let data = negotiation.partial_data();
  (data.is_empty() || contains(data, name)) && !contains(negotiation.partial_except(), name)
}

impl fmt::Debug for Prop {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Value(v) | Self::Always(v) => f.debug_tuple(self.kind()).field(v).finish(),
      Self::Errors(map) => f.debug_tuple(self.kind()).field(map).finish(),
      _ => f.write_str(self.kind()),
    }
  }
}

impl From<Value> for Prop {
  fn from(value: Value) -> Self {
    Self::Value(value)
  }
}

impl From<&str> for Prop {
  fn from(value: &str) -> Self {
    Self::Value(Value::String(value.to_string()))
  }
}

impl From<String> for Prop {
  fn from(value: String) -> Self {
    Self::Value(Value::String(value))
  }
}

#[derive(Clone)]
pub struct DeferredProp {
  resolver: PropFn,
  group: Option<String>,
}

impl DeferredProp {
  /// Props in the same group are fetched by one follow-up request.
  pub fn group(mut self, group: impl Into<String>) -> Self {
    self.group = Some(group.into());
    self
  }
}

impl From<DeferredProp> for Prop {
  fn from(prop: DeferredProp) -> Self {
    Self::Deferred(prop)
  }
}

#[derive(Clone)]
pub struct OnceProp {
  resolver: PropFn,
  expires_at: Option<i64>,
  fresh: bool,
  alias: Option<String>,
}

impl OnceProp {
  /// Resolve even when the client reports a cached copy.
  pub fn fresh(self) -> Self {
    self.fresh_when(true)
  }

  pub fn fresh_when(mut self, fresh: bool) -> Self {
    self.fresh = fresh;
    self
  }

  /// Client-side cache key, shared across pages.
  pub fn alias(mut self, alias: impl Into<String>) -> Self {
    self.alias = Some(alias.into());
    self
  }

  /// Expire the cached copy `ttl` from now.
  pub fn until(self, ttl: Duration) -> Self {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    let millis = i64::try_from((now + ttl).as_millis()).unwrap_or(i64::MAX);
    self.expires_at(millis)
  }

  /// Expire the cached copy at an absolute epoch-millisecond timestamp.
  pub fn expires_at(mut self, epoch_millis: i64) -> Self {
    self.expires_at = Some(epoch_millis);
    self
  }
}

impl From<OnceProp> for Prop {
  fn from(prop: OnceProp) -> Self {
    Self::Once(prop)
  }
}

#[derive(Clone)]
pub struct MergeProp {
  resolver: PropFn,
  append: Vec<String>,
  prepend: Vec<String>,
  match_on: Vec<String>,
  deep: bool,
}

impl MergeProp {
  /// Append at nested paths instead of the prop root.
  pub fn append<I, S>(mut self, paths: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.append = paths.into_iter().map(Into::into).collect();
    self
  }

  pub fn prepend<I, S>(mut self, paths: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.prepend = paths.into_iter().map(Into::into).collect();
    self
  }

  /// Keys used to match array items while merging, e.g. `data.id`.
  pub fn match_on<I, S>(mut self, keys: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.match_on = keys.into_iter().map(Into::into).collect();
    self
  }

  pub fn deep_merge(mut self) -> Self {
    self.deep = true;
    self
  }

  fn annotate(&self, name: &str, out: &mut ProcessedProps) {
    if self.deep {
      out.push_deep_merge(name.to_string());
    } else if !self.prepend.is_empty() {
      for path in &self.prepend {
        out.push_prepend(format!("{name}.{path}"));
      }
    } else if !self.append.is_empty() {
      for path in &self.append {
        out.push_merge(format!("{name}.{path}"));
      }
    } else {
      out.push_merge(name.to_string());
    }
    for key in &self.match_on {
      out.push_match_on(format!("{name}.{key}"));
    }
  }
}

impl From<MergeProp> for Prop {
  fn from(prop: MergeProp) -> Self {
    Self::Merge(prop)
  }
}

/// Pagination state of a scroll prop.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollMetadata {
  pub page_name: String,
  pub previous_page: Value,
  pub next_page: Value,
  pub current_page: Value,
}

impl Default for ScrollMetadata {
  fn default() -> Self {
    Self {
      page_name: DEFAULT_PAGE_NAME.to_string(),
      previous_page: Value::Null,
      next_page: Value::Null,
      current_page: Value::Null,
    }
  }
}

#[derive(Clone)]
pub struct ScrollProp {
  resolver: PropFn,
  wrapper: String,
  metadata: Option<ScrollMetadata>,
}

impl ScrollProp {
  /// Key the items are wrapped under, `data` by default.
  pub fn wrapper(mut self, wrapper: impl Into<String>) -> Self {
    self.wrapper = wrapper.into();
    self
  }

  pub fn metadata(mut self, metadata: ScrollMetadata) -> Self {
    self.metadata = Some(metadata);
    self
  }

  fn annotate(&self, name: &str, negotiation: &Negotiation<'_>, out: &mut ProcessedProps) {
    let meta = self.metadata.clone().unwrap_or_default();
    out.insert_scroll(
      name,
      ScrollEntry {
        page_name: meta.page_name,
        previous_page: meta.previous_page,
        next_page: meta.next_page,
        current_page: meta.current_page,
        reset: negotiation.is_reset(name),
      },
    );
    let path = format!("{name}.{}", self.wrapper);
    match negotiation.merge_intent() {
      MergeIntent::Prepend => out.push_prepend(path),
      MergeIntent::Append => out.push_merge(path),
    }
  }
}

impl From<ScrollProp> for Prop {
  fn from(prop: ScrollProp) -> Self {
    Self::Scroll(prop)
  }
}
