/* src/server/engine/rust/src/template/parser.rs */

use super::token::Token;
use super::{BODY_PLACEHOLDER, HEAD_PLACEHOLDER, TemplateError, TemplateFunctions};

#[derive(Debug)]
pub(super) enum Node {
  Text(String),
  Head,
  Body,
  Call { name: String, args: Vec<String> },
}

pub(super) fn parse(
  tokens: Vec<Token>,
  functions: &TemplateFunctions,
) -> Result<Vec<Node>, TemplateError> {
  let mut nodes = Vec::with_capacity(tokens.len());
  let mut has_body = false;

  for token in tokens {
    match token {
      Token::Text(text) => nodes.push(Node::Text(text)),
      Token::Action { body, offset } => {
        let mut words = split_words(&body, offset)?.into_iter();
        let Some(name) = words.next() else {
          return Err(TemplateError::Empty { offset });
        };
        let args: Vec<String> = words.collect();

        match name.as_str() {
          HEAD_PLACEHOLDER | BODY_PLACEHOLDER if !args.is_empty() => {
            return Err(TemplateError::UnexpectedArguments { name });
          }
          HEAD_PLACEHOLDER => nodes.push(Node::Head),
          BODY_PLACEHOLDER => {
            has_body = true;
            nodes.push(Node::Body);
          }
          _ if functions.contains_key(&name) => nodes.push(Node::Call { name, args }),
          _ => return Err(TemplateError::UnknownFunction { name }),
        }
      }
    }
  }

  if !has_body {
    return Err(TemplateError::MissingBody);
  }
  Ok(nodes)
}

/// Split an action body into words. Double-quoted words may contain spaces
/// and `\"` / `\\` escapes.
fn split_words(body: &str, offset: usize) -> Result<Vec<String>, TemplateError> {
  let mut words = Vec::new();
  let mut chars = body.chars().peekable();

  while let Some(&ch) = chars.peek() {
    if ch.is_whitespace() {
      chars.next();
      continue;
    }

    let mut word = String::new();
    if ch == '"' {
      chars.next();
      let mut closed = false;
      while let Some(c) = chars.next() {
        match c {
          '\\' => {
            if let Some(escaped) = chars.next() {
              word.push(escaped);
            }
          }
          '"' => {
            closed = true;
            break;
          }
          c => word.push(c),
        }
      }
      if !closed {
        return Err(TemplateError::UnterminatedString { offset });
      }
    } else {
      while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
          break;
        }
        word.push(c);
        chars.next();
      }
    }
    words.push(word);
  }

  Ok(words)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn split_bare_and_quoted() {
    let words = split_words(r#"vite "ts/app.tsx" extra"#, 0).unwrap();
    assert_eq!(words, vec!["vite", "ts/app.tsx", "extra"]);
  }

  #[test]
  fn split_quoted_with_spaces_and_escapes() {
    let words = split_words(r#"f "a b" "say \"hi\"""#, 0).unwrap();
    assert_eq!(words, vec!["f", "a b", r#"say "hi""#]);
  }

  #[test]
  fn split_unterminated_string() {
    let err = split_words(r#"vite "ts/app.tsx"#, 12).unwrap_err();
    assert!(matches!(err, TemplateError::UnterminatedString { offset: 12 }));
  }
}
