/* src/server/core/rust/src/csrf.rs */

// Double-submit cookie protection: the client echoes the readable
// `XSRF-TOKEN` cookie back in the `X-XSRF-TOKEN` header.

use serde::Deserialize;

pub const CSRF_COOKIE: &str = "XSRF-TOKEN";
pub const CSRF_HEADER: &str = "X-XSRF-TOKEN";
/// Status sent when the token is missing or does not match.
pub const CSRF_MISMATCH_STATUS: u16 = 419;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CsrfConfig {
  /// Mark the token cookie `Secure`.
  pub secure: bool,
}

pub fn generate_token() -> String {
  hex::encode(rand::random::<[u8; 32]>())
}

/// Compare two tokens in time independent of where they differ.
/// Empty tokens never match.
pub fn tokens_match(expected: &str, actual: &str) -> bool {
  if expected.is_empty() || expected.len() != actual.len() {
    return false;
  }
  expected.bytes().zip(actual.bytes()).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

pub fn is_state_changing(method: &str) -> bool {
  matches!(method, "POST" | "PUT" | "PATCH" | "DELETE")
}

/// Whether a request passes the check. Safe methods always do.
pub fn verify(method: &str, cookie: Option<&str>, header: Option<&str>) -> bool {
  if !is_state_changing(method) {
    return true;
  }
  match (cookie, header) {
    (Some(cookie), Some(header)) => tokens_match(cookie, header),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tokens_are_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(token, generate_token());
  }

  #[test]
  fn match_requires_equal_non_empty_tokens() {
    assert!(tokens_match("abc", "abc"));
    assert!(!tokens_match("abc", "abd"));
    assert!(!tokens_match("abc", "abcd"));
    assert!(!tokens_match("", ""));
  }

  #[test]
  fn only_unsafe_methods_are_checked() {
    for method in ["GET", "HEAD", "OPTIONS"] {
      assert!(!is_state_changing(method));
      assert!(verify(method, None, None));
    }
    for method in ["POST", "PUT", "PATCH", "DELETE"] {
      assert!(is_state_changing(method));
      assert!(!verify(method, Some("t"), None));
      assert!(!verify(method, None, Some("t")));
      assert!(!verify(method, Some("t"), Some("u")));
      assert!(verify(method, Some("t"), Some("t")));
    }
  }
}
