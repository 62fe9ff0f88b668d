/* src/server/core/rust/src/state.rs */

use serde_json::{Map, Value};

use crate::prop::Prop;
use crate::props::Props;

/// Per-request state filled by middleware before the handler renders:
/// validation errors flashed by the previous request and request-scoped
/// shared props.
#[derive(Debug, Clone, Default)]
pub struct RequestState {
  flashed_errors: Option<Map<String, Value>>,
  shared: Props,
}

impl RequestState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_flashed_errors(mut self, errors: Map<String, Value>) -> Self {
    self.flashed_errors = Some(errors);
    self
  }

  pub fn set_flashed_errors(&mut self, errors: Map<String, Value>) {
    self.flashed_errors = Some(errors);
  }

  pub fn flashed_errors(&self) -> Option<&Map<String, Value>> {
    self.flashed_errors.as_ref()
  }

  /// Share a prop with every page rendered for this request.
  pub fn share(&mut self, name: impl Into<String>, prop: impl Into<Prop>) {
    self.shared.insert(name, prop);
  }

  pub fn shared(&self) -> &Props {
    &self.shared
  }
}
