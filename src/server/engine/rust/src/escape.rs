/* src/server/engine/rust/src/escape.rs */

/// Escape the five HTML-significant characters so the result is safe both as
/// text content and inside a double-quoted attribute value.
pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      _ => out.push(ch),
    }
  }
  out
}

/// Escape non-ASCII characters in JSON string values to `\uXXXX` sequences.
///
/// Walks the JSON text tracking whether the current position is inside a
/// JSON string (handling `\"` and `\\` correctly). Non-ASCII codepoints
/// inside strings are replaced with their `\uXXXX` representation; chars
/// outside the BMP are encoded as surrogate pairs (`\uHHHH\uLLLL`).
pub fn ascii_escape_json(json: &str) -> String {
  let mut out = String::with_capacity(json.len());
  let mut in_string = false;
  let mut chars = json.chars();

  while let Some(ch) = chars.next() {
    if !in_string {
      if ch == '"' {
        in_string = true;
      }
      out.push(ch);
      continue;
    }

    match ch {
      '\\' => {
        out.push(ch);
        if let Some(next) = chars.next() {
          out.push(next);
        }
      }
      '"' => {
        in_string = false;
        out.push(ch);
      }
      c if (c as u32) > 0x7F => {
        let code = c as u32;
        if code > 0xFFFF {
          let adjusted = code - 0x1_0000;
          let hi = (adjusted >> 10) + 0xD800;
          let lo = (adjusted & 0x3FF) + 0xDC00;
          out.push_str(&format!("\\u{hi:04x}\\u{lo:04x}"));
        } else {
          out.push_str(&format!("\\u{code:04x}"));
        }
      }
      c => out.push(c),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escape_html_specials() {
    assert_eq!(
      escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
      "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
    );
  }

  #[test]
  fn escape_html_passthrough() {
    assert_eq!(escape_html("plain text"), "plain text");
  }

  #[test]
  fn ascii_passthrough() {
    let input = r#"{"key":"hello"}"#;
    assert_eq!(ascii_escape_json(input), input);
  }

  #[test]
  fn escapes_cjk_in_values() {
    let input = "{\"msg\":\"\u{4f60}\u{597d}\"}";
    assert_eq!(ascii_escape_json(input), r#"{"msg":"\u4f60\u597d"}"#);
  }

  #[test]
  fn preserves_existing_escapes() {
    let input = r#"{"a":"say \"hi\"","b":"line\nbreak"}"#;
    assert_eq!(ascii_escape_json(input), input);
  }

  #[test]
  fn surrogate_pair_for_emoji() {
    let input = "{\"emoji\":\"\u{1F600}\"}";
    assert_eq!(ascii_escape_json(input), r#"{"emoji":"\ud83d\ude00"}"#);
  }

  #[test]
  fn escaped_json_still_parses() {
    let value = serde_json::json!({"title": "caf\u{e9}", "n": 1});
    let escaped = ascii_escape_json(&value.to_string());
    assert!(escaped.is_ascii());
    let back: serde_json::Value = serde_json::from_str(&escaped).unwrap();
    assert_eq!(back, value);
  }
}
