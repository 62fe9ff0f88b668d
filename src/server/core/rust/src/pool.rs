/* src/server/core/rust/src/pool.rs */

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};

use crate::page::{OnceEntry, ScrollEntry};

pub const DEFAULT_POOL_SIZE: usize = 64;

/// Everything the prop engine produces for one render.
#[derive(Debug, Default)]
pub struct ProcessedProps {
  values: Map<String, Value>,
  deferred: BTreeMap<String, Vec<String>>,
  once: BTreeMap<String, OnceEntry>,
  scroll: BTreeMap<String, ScrollEntry>,
  merge_props: Vec<String>,
  prepend_props: Vec<String>,
  deep_merge_props: Vec<String>,
  match_props_on: Vec<String>,
}

impl ProcessedProps {
  pub fn values(&self) -> &Map<String, Value> {
    &self.values
  }

  pub fn deferred(&self) -> &BTreeMap<String, Vec<String>> {
    &self.deferred
  }

  pub fn once(&self) -> &BTreeMap<String, OnceEntry> {
    &self.once
  }

  pub fn scroll(&self) -> &BTreeMap<String, ScrollEntry> {
    &self.scroll
  }

  pub fn merge_props(&self) -> &[String] {
    &self.merge_props
  }

  pub fn prepend_props(&self) -> &[String] {
    &self.prepend_props
  }

  pub fn deep_merge_props(&self) -> &[String] {
    &self.deep_merge_props
  }

  pub fn match_props_on(&self) -> &[String] {
    &self.match_props_on
  }

  /// Empty every collection, keeping allocations.
  pub fn clear(&mut self) {
    self.values.clear();
    self.deferred.clear();
    self.once.clear();
    self.scroll.clear();
    self.merge_props.clear();
    self.prepend_props.clear();
    self.deep_merge_props.clear();
    self.match_props_on.clear();
  }

  pub(crate) fn insert_value(&mut self, name: &str, value: Value) {
    self.values.insert(name.to_string(), value);
  }

  pub(crate) fn ensure_value(&mut self, name: &str, default: impl FnOnce() -> Value) {
    self.values.entry(name).or_insert_with(default);
  }

  pub(crate) fn push_deferred(&mut self, group: &str, name: String) {
    self.deferred.entry(group.to_string()).or_default().push(name);
  }

  pub(crate) fn insert_once(&mut self, name: &str, entry: OnceEntry) {
    self.once.insert(name.to_string(), entry);
  }

  pub(crate) fn insert_scroll(&mut self, name: &str, entry: ScrollEntry) {
    self.scroll.insert(name.to_string(), entry);
  }

  pub(crate) fn push_merge(&mut self, path: String) {
    self.merge_props.push(path);
  }

  pub(crate) fn push_prepend(&mut self, path: String) {
    self.prepend_props.push(path);
  }

  pub(crate) fn push_deep_merge(&mut self, path: String) {
    self.deep_merge_props.push(path);
  }

  pub(crate) fn push_match_on(&mut self, path: String) {
    self.match_props_on.push(path);
  }
}

/// Recycles [`ProcessedProps`] between renders.
#[derive(Debug)]
pub struct PropsPool {
  idle: Mutex<Vec<ProcessedProps>>,
  max_idle: usize,
}

impl PropsPool {
  pub fn new(max_idle: usize) -> Self {
    Self { idle: Mutex::new(Vec::new()), max_idle }
  }

  /// Take a cleared aggregate. It goes back to the pool when the guard drops,
  /// whether the render succeeded, failed or was cancelled.
  pub fn acquire(&self) -> PooledProps<'_> {
    let mut props =
      self.idle.lock().unwrap_or_else(PoisonError::into_inner).pop().unwrap_or_default();
    props.clear();
    PooledProps { pool: self, props }
  }

  pub fn idle_count(&self) -> usize {
    self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  fn release(&self, props: ProcessedProps) {
    let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
    if idle.len() < self.max_idle {
      idle.push(props);
    }
  }
}

impl Default for PropsPool {
  fn default() -> Self {
    Self::new(DEFAULT_POOL_SIZE)
  }
}

/// Exclusive handle on a pooled aggregate.
#[derive(Debug)]
pub struct PooledProps<'a> {
  pool: &'a PropsPool,
  props: ProcessedProps,
}

impl Deref for PooledProps<'_> {
  type Target = ProcessedProps;

  fn deref(&self) -> &ProcessedProps {
    &self.props
  }
}

impl DerefMut for PooledProps<'_> {
  fn deref_mut(&mut self) -> &mut ProcessedProps {
    &mut self.props
  }
}

impl Drop for PooledProps<'_> {
  fn drop(&mut self) {
    self.pool.release(std::mem::take(&mut self.props));
  }
}
