/* src/server/engine/rust/src/template/token.rs */

use super::TemplateError;

#[derive(Debug)]
pub(super) enum Token {
  Text(String),
  /// Directive body between `{{` and `}}`, trimmed, with its byte offset.
  Action { body: String, offset: usize },
}

pub(super) const ACTION_OPEN: &str = "{{";
pub(super) const ACTION_CLOSE: &str = "}}";

pub(super) fn tokenize(template: &str) -> Result<Vec<Token>, TemplateError> {
  let mut tokens = Vec::new();
  let mut pos = 0;

  while pos < template.len() {
    let Some(rel) = template[pos..].find(ACTION_OPEN) else {
      tokens.push(Token::Text(template[pos..].to_string()));
      break;
    };

    let action_start = pos + rel;
    if action_start > pos {
      tokens.push(Token::Text(template[pos..action_start].to_string()));
    }

    let after_open = action_start + ACTION_OPEN.len();
    let close_rel = template[after_open..]
      .find(ACTION_CLOSE)
      .ok_or(TemplateError::Unclosed { offset: action_start })?;

    let body = template[after_open..after_open + close_rel].trim().to_string();
    tokens.push(Token::Action { body, offset: action_start });
    pos = after_open + close_rel + ACTION_CLOSE.len();
  }

  Ok(tokens)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tokenize_empty_template() {
    assert!(tokenize("").unwrap().is_empty());
  }

  #[test]
  fn tokenize_plain_html() {
    let tokens = tokenize("<p>hello</p>").unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(matches!(&tokens[0], Token::Text(s) if s == "<p>hello</p>"));
  }

  #[test]
  fn tokenize_trims_action_body() {
    let tokens = tokenize("a{{  inertia_body  }}b").unwrap();
    assert_eq!(tokens.len(), 3);
    assert!(matches!(&tokens[1], Token::Action { body, offset: 1 } if body == "inertia_body"));
    assert!(matches!(&tokens[2], Token::Text(s) if s == "b"));
  }

  #[test]
  fn tokenize_adjacent_actions() {
    let tokens = tokenize("{{a}}{{b}}").unwrap();
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], Token::Action { body, .. } if body == "a"));
    assert!(matches!(&tokens[1], Token::Action { body, .. } if body == "b"));
  }

  #[test]
  fn tokenize_unclosed_action_is_error() {
    let err = tokenize("<head>{{ inertia_head").unwrap_err();
    assert!(matches!(err, TemplateError::Unclosed { offset: 6 }));
  }
}
