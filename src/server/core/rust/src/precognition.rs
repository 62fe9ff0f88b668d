/* src/server/core/rust/src/precognition.rs */

use serde_json::{Map, Value, json};

use crate::headers::{RequestSignals, contains};

pub const PRECOGNITION_SUCCESS_STATUS: u16 = 204;
pub const PRECOGNITION_ERROR_STATUS: u16 = 422;

/// Validation-only request: validate the submitted fields and reply with
/// the result instead of running the action.
pub fn is_precognition(signals: &RequestSignals) -> bool {
  signals.precognition
}

/// Fields the client wants validated. Empty means all of them.
pub fn precognition_fields(signals: &RequestSignals) -> &[String] {
  &signals.validate_only
}

pub fn should_validate_field(signals: &RequestSignals, field: &str) -> bool {
  let fields = precognition_fields(signals);
  fields.is_empty() || contains(fields, field)
}

/// Nest errors under the request's error bag, if it names one.
pub fn nest_error_bag(errors: Map<String, Value>, bag: Option<&str>) -> Map<String, Value> {
  match bag {
    Some(bag) if !bag.is_empty() => {
      let mut nested = Map::new();
      nested.insert(bag.to_string(), Value::Object(errors));
      nested
    }
    _ => errors,
  }
}

/// Body of a failed precognition response.
pub fn error_body(errors: Map<String, Value>) -> Value {
  json!({ "errors": errors })
}
