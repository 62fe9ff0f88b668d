/* src/server/adapter/axum/src/cookie.rs */

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use inertia_core::CsrfConfig;
use inertia_core::csrf::CSRF_COOKIE;
use inertia_core::session::SESSION_MAX_AGE_SECS;

/// Value of cookie `name`, if present and non-empty.
pub(crate) fn get<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers
    .get_all(COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|header| header.split(';'))
    .find_map(|pair| {
      let (k, v) = pair.trim().split_once('=')?;
      (k.trim() == name).then(|| v.trim())
    })
    .filter(|v| !v.is_empty())
}

pub(crate) fn session(name: &str, id: &str) -> String {
  format!("{name}={id}; Path=/; Max-Age={SESSION_MAX_AGE_SECS}; HttpOnly; SameSite=Lax")
}

/// Token cookie. Not HttpOnly: the client reads it to echo the header.
pub(crate) fn csrf(token: &str, config: CsrfConfig) -> String {
  let secure = if config.secure { "; Secure" } else { "" };
  format!("{CSRF_COOKIE}={token}; Path=/; SameSite=Lax{secure}")
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  #[test]
  fn finds_cookie_among_pairs() {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_static("a=1; sid = abc ;b=2"));
    assert_eq!(get(&headers, "sid"), Some("abc"));
    assert_eq!(get(&headers, "b"), Some("2"));
    assert_eq!(get(&headers, "c"), None);
  }

  #[test]
  fn searches_every_cookie_header_and_skips_empty_values() {
    let mut headers = HeaderMap::new();
    headers.append(COOKIE, HeaderValue::from_static("sid="));
    headers.append(COOKIE, HeaderValue::from_static("XSRF-TOKEN=t"));
    assert_eq!(get(&headers, "sid"), None);
    assert_eq!(get(&headers, CSRF_COOKIE), Some("t"));
  }

  #[test]
  fn cookie_attributes() {
    assert_eq!(session("sid", "x"), "sid=x; Path=/; Max-Age=86400; HttpOnly; SameSite=Lax");
    assert_eq!(csrf("t", CsrfConfig { secure: false }), "XSRF-TOKEN=t; Path=/; SameSite=Lax");
    assert!(csrf("t", CsrfConfig { secure: true }).ends_with("; Secure"));
  }
}
