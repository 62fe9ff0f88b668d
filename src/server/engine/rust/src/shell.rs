/* src/server/engine/rust/src/shell.rs */

use crate::escape::{ascii_escape_json, escape_html};

/// Element id the client mounts onto.
pub const APP_ELEMENT_ID: &str = "app";

/// Body used when SSR is disabled: an empty mount element carrying the
/// serialized page object in its `data-page` attribute.
pub fn fallback_body(page_json: &str) -> String {
  let escaped = escape_html(&ascii_escape_json(page_json));
  format!(r#"<div id="{APP_ELEMENT_ID}" data-page="{escaped}"></div>"#)
}

/// Join SSR head fragments, one per line.
pub fn join_head(head: &[String]) -> String {
  head.join("\n")
}
