/* src/server/core/rust/src/redirect.rs */

use crate::headers::RequestSignals;

pub const FOUND: u16 = 302;
pub const SEE_OTHER: u16 = 303;
pub const CONFLICT: u16 = 409;

/// 303 after PUT/PATCH/DELETE so the browser follows up with a GET;
/// 302 for everything else.
pub fn redirect_status(method: &str) -> u16 {
  match method {
    "PUT" | "PATCH" | "DELETE" => SEE_OTHER,
    _ => FOUND,
  }
}

/// The referring page, or `/` when the request carries none.
pub fn back_url(signals: &RequestSignals) -> &str {
  signals.referer.as_deref().unwrap_or("/")
}
