/* src/server/core/rust/src/props.rs */

use std::collections::BTreeMap;
use std::collections::btree_map::IntoIter;

use crate::prop::Prop;

/// Named props of one render, iterated in name order.
#[derive(Debug, Clone, Default)]
pub struct Props {
  entries: BTreeMap<String, Prop>,
}

impl Props {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style insert.
  pub fn with(mut self, name: impl Into<String>, prop: impl Into<Prop>) -> Self {
    self.insert(name, prop);
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, prop: impl Into<Prop>) -> Option<Prop> {
    self.entries.insert(name.into(), prop.into())
  }

  pub fn remove(&mut self, name: &str) -> Option<Prop> {
    self.entries.remove(name)
  }

  pub fn get(&self, name: &str) -> Option<&Prop> {
    self.entries.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Overlay `other`; its entries win on name collision.
  pub fn extend(&mut self, other: Props) {
    self.entries.extend(other.entries);
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.keys().map(String::as_str)
  }
}

impl IntoIterator for Props {
  type Item = (String, Prop);
  type IntoIter = IntoIter<String, Prop>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}

impl<K, P> FromIterator<(K, P)> for Props
where
  K: Into<String>,
  P: Into<Prop>,
{
  fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
    let mut props = Self::new();
    for (name, prop) in iter {
      props.insert(name, prop);
    }
    props
  }
}
