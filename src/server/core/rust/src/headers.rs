/* src/server/core/rust/src/headers.rs */

// Protocol header names. Lookups go through the adapter's header map,
// which compares names case-insensitively.

pub const X_INERTIA: &str = "X-Inertia";
pub const X_INERTIA_VERSION: &str = "X-Inertia-Version";
pub const X_INERTIA_LOCATION: &str = "X-Inertia-Location";
pub const X_INERTIA_PARTIAL_COMPONENT: &str = "X-Inertia-Partial-Component";
pub const X_INERTIA_PARTIAL_DATA: &str = "X-Inertia-Partial-Data";
pub const X_INERTIA_PARTIAL_EXCEPT: &str = "X-Inertia-Partial-Except";
pub const X_INERTIA_EXCEPT_ONCE_PROPS: &str = "X-Inertia-Except-Once-Props";
pub const X_INERTIA_RESET: &str = "X-Inertia-Reset";
pub const X_INERTIA_MERGE_INTENT: &str = "X-Inertia-Infinite-Scroll-Merge-Intent";
pub const X_INERTIA_ERROR_BAG: &str = "X-Inertia-Error-Bag";
pub const PRECOGNITION: &str = "Precognition";
pub const PRECOGNITION_SUCCESS: &str = "Precognition-Success";
pub const PRECOGNITION_VALIDATE_ONLY: &str = "Precognition-Validate-Only";
pub const REFERER: &str = "Referer";

/// Direction in which the client appends the next page of a scroll prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeIntent {
  #[default]
  Append,
  Prepend,
}

impl MergeIntent {
  fn parse(raw: Option<&str>) -> Self {
    match raw.map(str::trim) {
      Some(v) if v.eq_ignore_ascii_case("prepend") => Self::Prepend,
      _ => Self::Append,
    }
  }
}

/// Everything the protocol reads from request headers, parsed once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSignals {
  pub inertia: bool,
  pub version: Option<String>,
  pub partial_component: Option<String>,
  pub partial_data: Vec<String>,
  pub partial_except: Vec<String>,
  pub except_once_props: Vec<String>,
  pub reset: Vec<String>,
  pub merge_intent: MergeIntent,
  pub error_bag: Option<String>,
  pub precognition: bool,
  pub validate_only: Vec<String>,
  pub referer: Option<String>,
}

impl RequestSignals {
  /// Parse signals through a header lookup. Never fails: absent or malformed
  /// headers degrade to their empty value.
  pub fn parse<'a, F>(header: F) -> Self
  where
    F: Fn(&str) -> Option<&'a str>,
  {
    Self {
      inertia: flag(header(X_INERTIA)),
      version: text(header(X_INERTIA_VERSION)),
      partial_component: text(header(X_INERTIA_PARTIAL_COMPONENT)),
      partial_data: list(header(X_INERTIA_PARTIAL_DATA)),
      partial_except: list(header(X_INERTIA_PARTIAL_EXCEPT)),
      except_once_props: list(header(X_INERTIA_EXCEPT_ONCE_PROPS)),
      reset: list(header(X_INERTIA_RESET)),
      merge_intent: MergeIntent::parse(header(X_INERTIA_MERGE_INTENT)),
      error_bag: text(header(X_INERTIA_ERROR_BAG)),
      precognition: flag(header(PRECOGNITION)),
      validate_only: list(header(PRECOGNITION_VALIDATE_ONLY)),
      referer: text(header(REFERER)),
    }
  }

  /// Negotiation context for rendering `component`. A partial request aimed
  /// at a different component is a full load.
  pub fn negotiate<'a>(&'a self, component: &str) -> Negotiation<'a> {
    let partial = self.inertia && self.partial_component.as_deref() == Some(component);
    Negotiation { signals: self, partial }
  }
}

fn flag(raw: Option<&str>) -> bool {
  raw.is_some_and(|v| v.trim() == "true")
}

fn text(raw: Option<&str>) -> Option<String> {
  raw.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn list(raw: Option<&str>) -> Vec<String> {
  raw
    .map(|v| v.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect())
    .unwrap_or_default()
}

/// Per-render view over [`RequestSignals`] with the partial flag resolved.
#[derive(Debug, Clone, Copy)]
pub struct Negotiation<'a> {
  signals: &'a RequestSignals,
  partial: bool,
}

impl<'a> Negotiation<'a> {
  pub fn is_inertia(&self) -> bool {
    self.signals.inertia
  }

  pub fn is_partial(&self) -> bool {
    self.partial
  }

  pub fn partial_data(&self) -> &'a [String] {
    &self.signals.partial_data
  }

  pub fn partial_except(&self) -> &'a [String] {
    &self.signals.partial_except
  }

  pub fn except_once(&self) -> &'a [String] {
    &self.signals.except_once_props
  }

  pub fn merge_intent(&self) -> MergeIntent {
    self.signals.merge_intent
  }

  pub fn requested(&self, name: &str) -> bool {
    self.partial && contains(&self.signals.partial_data, name)
  }

  pub fn excepted(&self, name: &str) -> bool {
    self.partial && contains(&self.signals.partial_except, name)
  }

  pub fn is_reset(&self, name: &str) -> bool {
    contains(&self.signals.reset, name)
  }

  pub fn signals(&self) -> &'a RequestSignals {
    self.signals
  }
}

pub(crate) fn contains(list: &[String], name: &str) -> bool {
  list.iter().any(|s| s == name)
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn signals(pairs: &[(&str, &str)]) -> RequestSignals {
    let map: HashMap<String, String> =
      pairs.iter().map(|(k, v)| (k.to_ascii_lowercase(), (*v).to_string())).collect();
    RequestSignals::parse(|name| map.get(&name.to_ascii_lowercase()).map(String::as_str))
  }

  #[test]
  fn no_headers_is_full_load() {
    let s = signals(&[]);
    assert_eq!(s, RequestSignals::default());
    let n = s.negotiate("Home");
    assert!(!n.is_inertia());
    assert!(!n.is_partial());
  }

  #[test]
  fn lists_are_trimmed_and_empty_entries_dropped() {
    let s = signals(&[
      (X_INERTIA, "true"),
      (X_INERTIA_PARTIAL_DATA, " foo, bar ,,baz "),
      (X_INERTIA_PARTIAL_EXCEPT, ""),
      (X_INERTIA_RESET, "feed"),
    ]);
    assert_eq!(s.partial_data, vec!["foo", "bar", "baz"]);
    assert!(s.partial_except.is_empty());
    assert_eq!(s.reset, vec!["feed"]);
  }

  #[test]
  fn partial_only_for_matching_component() {
    let s = signals(&[
      (X_INERTIA, "true"),
      (X_INERTIA_PARTIAL_COMPONENT, "Users/Index"),
      (X_INERTIA_PARTIAL_DATA, "users"),
    ]);
    let n = s.negotiate("Users/Index");
    assert!(n.is_partial());
    assert!(n.requested("users"));

    let stale = s.negotiate("Users/Show");
    assert!(stale.is_inertia());
    assert!(!stale.is_partial());
    assert!(!stale.requested("users"));
  }

  #[test]
  fn partial_requires_protocol_flag() {
    let s = signals(&[(X_INERTIA_PARTIAL_COMPONENT, "Home"), (X_INERTIA_PARTIAL_DATA, "a")]);
    assert!(!s.negotiate("Home").is_partial());
  }

  #[test]
  fn flag_must_be_literal_true() {
    assert!(!signals(&[(X_INERTIA, "1")]).inertia);
    assert!(!signals(&[(PRECOGNITION, "yes")]).precognition);
    assert!(signals(&[(PRECOGNITION, "true")]).precognition);
  }

  #[test]
  fn merge_intent_defaults_to_append() {
    assert_eq!(signals(&[]).merge_intent, MergeIntent::Append);
    assert_eq!(signals(&[(X_INERTIA_MERGE_INTENT, "bogus")]).merge_intent, MergeIntent::Append);
    assert_eq!(signals(&[(X_INERTIA_MERGE_INTENT, "prepend")]).merge_intent, MergeIntent::Prepend);
  }

  #[test]
  fn text_headers_ignore_blank_values() {
    let s = signals(&[(X_INERTIA_VERSION, "  "), (X_INERTIA_ERROR_BAG, "login")]);
    assert_eq!(s.version, None);
    assert_eq!(s.error_bag.as_deref(), Some("login"));
  }
}
