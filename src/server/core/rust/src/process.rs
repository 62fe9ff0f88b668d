/* src/server/core/rust/src/process.rs */

use serde_json::{Map, Value};
use tokio::task::JoinSet;
use tracing::debug;

use crate::errors::InertiaError;
use crate::headers::Negotiation;
use crate::pool::ProcessedProps;
use crate::producer::PropCtx;
use crate::prop::{Prop, Resolution};
use crate::props::Props;
use crate::session::ERRORS_KEY;

/// Resolve `props` for one render into `out`.
///
/// Inclusion and annotation run in name order. Included producers then run
/// concurrently; the first failure aborts the render and the rest of the
/// producers are cancelled when the task set drops. `out` always ends up
/// with an `errors` entry.
pub async fn process_props(
  mut props: Props,
  negotiation: &Negotiation<'_>,
  flashed_errors: Option<&Map<String, Value>>,
  ctx: &PropCtx,
  out: &mut ProcessedProps,
) -> Result<(), InertiaError> {
  merge_flashed_errors(&mut props, flashed_errors);

  let mut pending = JoinSet::new();
  for (name, prop) in props {
    let included = prop.should_include(&name, negotiation);
    prop.annotate(&name, negotiation, included, out);
    if !included {
      continue;
    }
    match prop.resolve(ctx.clone()) {
      Resolution::Ready(value) => out.insert_value(&name, value),
      Resolution::Pending(fut) => {
        pending.spawn(async move { (name, fut.await) });
      }
    }
  }

  debug!(component = ctx.component(), producers = pending.len(), "resolving props");
  while let Some(joined) = pending.join_next().await {
    let (name, result) = joined.map_err(|e| InertiaError::PropTask(e.to_string()))?;
    let value = result.map_err(|source| InertiaError::Prop { name: name.clone(), source })?;
    out.insert_value(&name, value);
  }

  out.ensure_value(ERRORS_KEY, || Value::Object(Map::new()));
  Ok(())
}

/// Fold errors flashed by the previous request into the `errors` prop. A
/// handler-supplied `Errors` map is the base; anything else named `errors`
/// is replaced.
fn merge_flashed_errors(props: &mut Props, flashed: Option<&Map<String, Value>>) {
  let Some(flashed) = flashed else {
    return;
  };
  let mut merged = match props.remove(ERRORS_KEY) {
    Some(Prop::Errors(base)) => base,
    _ => Map::new(),
  };
  deep_merge(&mut merged, flashed);
  props.insert(ERRORS_KEY, Prop::Errors(merged));
}

/// Objects merge key by key; any other value in `src` replaces `dst`'s.
pub(crate) fn deep_merge(dst: &mut Map<String, Value>, src: &Map<String, Value>) {
  for (key, value) in src {
    match (dst.get_mut(key), value) {
      (Some(Value::Object(existing)), Value::Object(incoming)) => deep_merge(existing, incoming),
      _ => {
        dst.insert(key.clone(), value.clone());
      }
    }
  }
}

#[cfg(test)]
mod tests;
