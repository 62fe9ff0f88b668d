/* src/server/core/rust/src/page.rs */

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::time::Instant;

use crate::pool::ProcessedProps;

/// Once directive sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnceEntry {
  pub prop: String,
  /// Epoch milliseconds; `null` means the value never expires.
  pub expires_at: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub alias: Option<String>,
}

/// Pagination descriptor of a scroll prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollEntry {
  pub page_name: String,
  pub previous_page: Value,
  pub next_page: Value,
  pub current_page: Value,
  pub reset: bool,
}

/// Wire contract of one rendered page. Borrows from the pooled aggregate
/// while rendering; deserializes into owned data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageObject<'a> {
  pub component: Cow<'a, str>,
  pub url: Cow<'a, str>,
  pub props: Cow<'a, Map<String, Value>>,
  pub version: Cow<'a, str>,
  pub encrypt_history: bool,
  pub clear_history: bool,
  pub merge_props: Vec<Cow<'a, str>>,
  pub prepend_props: Vec<Cow<'a, str>>,
  pub deep_merge_props: Vec<Cow<'a, str>>,
  pub match_props_on: Vec<Cow<'a, str>>,
  pub deferred_props: Cow<'a, BTreeMap<String, Vec<String>>>,
  pub once_props: Cow<'a, BTreeMap<String, OnceEntry>>,
  #[serde(default, skip_serializing_if = "is_empty")]
  pub scroll_props: Cow<'a, BTreeMap<String, ScrollEntry>>,
}

fn is_empty<T>(map: &Cow<'_, BTreeMap<String, T>>) -> bool
where
  T: Clone,
{
  map.is_empty()
}

impl<'a> PageObject<'a> {
  /// Build the page object. Each path list is the caller's entries from
  /// `options` followed by the engine-derived entries.
  pub fn assemble(
    component: &'a str,
    url: &'a str,
    version: &'a str,
    props: &'a ProcessedProps,
    options: &'a RenderOptions,
  ) -> Self {
    Self {
      component: Cow::Borrowed(component),
      url: Cow::Borrowed(url),
      props: Cow::Borrowed(props.values()),
      version: Cow::Borrowed(version),
      encrypt_history: options.encrypt_history.unwrap_or(false),
      clear_history: options.clear_history.unwrap_or(false),
      merge_props: concat(&options.merge_props, props.merge_props()),
      prepend_props: concat(&options.prepend_props, props.prepend_props()),
      deep_merge_props: concat(&options.deep_merge_props, props.deep_merge_props()),
      match_props_on: concat(&options.match_props_on, props.match_props_on()),
      deferred_props: Cow::Borrowed(props.deferred()),
      once_props: Cow::Borrowed(props.once()),
      scroll_props: Cow::Borrowed(props.scroll()),
    }
  }
}

fn concat<'a>(first: &'a [String], second: &'a [String]) -> Vec<Cow<'a, str>> {
  first.iter().chain(second).map(|s| Cow::Borrowed(s.as_str())).collect()
}

/// Per-render options.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
  encrypt_history: Option<bool>,
  clear_history: Option<bool>,
  merge_props: Vec<String>,
  prepend_props: Vec<String>,
  deep_merge_props: Vec<String>,
  match_props_on: Vec<String>,
  deadline: Option<Instant>,
}

impl RenderOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn encrypt_history(mut self, encrypt: bool) -> Self {
    self.encrypt_history = Some(encrypt);
    self
  }

  pub fn clear_history(mut self, clear: bool) -> Self {
    self.clear_history = Some(clear);
    self
  }

  pub fn merge_props<I, S>(mut self, paths: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.merge_props.extend(paths.into_iter().map(Into::into));
    self
  }

  pub fn prepend_props<I, S>(mut self, paths: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.prepend_props.extend(paths.into_iter().map(Into::into));
    self
  }

  pub fn deep_merge_props<I, S>(mut self, paths: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.deep_merge_props.extend(paths.into_iter().map(Into::into));
    self
  }

  pub fn match_props_on<I, S>(mut self, keys: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.match_props_on.extend(keys.into_iter().map(Into::into));
    self
  }

  /// Deadline passed through to prop producers via [`crate::PropCtx`].
  pub fn deadline(mut self, deadline: Instant) -> Self {
    self.deadline = Some(deadline);
    self
  }

  pub fn deadline_at(&self) -> Option<Instant> {
    self.deadline
  }

  pub(crate) fn encrypt_history_or(&mut self, default: bool) {
    self.encrypt_history.get_or_insert(default);
  }
}
