/* src/server/engine/rust/src/template/mod.rs */

// Root HTML template: plain text with `{{ ... }}` actions.
//   {{ inertia_head }}          SSR head tags (empty without SSR)
//   {{ inertia_body }}          SSR body or the fallback app element
//   {{ name "arg" ... }}        call a bundler-provided template function

mod parser;
mod token;


use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parser::{Node, parse};
use token::tokenize;

pub(crate) const HEAD_PLACEHOLDER: &str = "inertia_head";
pub(crate) const BODY_PLACEHOLDER: &str = "inertia_body";

/// Used when no root template is configured.
pub const DEFAULT_ROOT_TEMPLATE: &str = concat!(
  "<!DOCTYPE html>\n",
  "<html>\n",
  "<head>\n",
  "<meta charset=\"utf-8\">\n",
  "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
  "{{ inertia_head }}\n",
  "</head>\n",
  "<body>\n",
  "{{ inertia_body }}\n",
  "</body>\n",
  "</html>\n",
);

/// A template function receives the action's arguments and returns trusted
/// HTML that is inserted without escaping.
pub type TemplateFn = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

pub type TemplateFunctions = BTreeMap<String, TemplateFn>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
  #[error("unclosed action at byte {offset}")]
  Unclosed { offset: usize },
  #[error("empty action at byte {offset}")]
  Empty { offset: usize },
  #[error("unterminated string in action at byte {offset}")]
  UnterminatedString { offset: usize },
  #[error("unknown template function `{name}`")]
  UnknownFunction { name: String },
  #[error("`{name}` takes no arguments")]
  UnexpectedArguments { name: String },
  #[error("template has no {{{{ inertia_body }}}} action")]
  MissingBody,
}

pub struct RootTemplate {
  nodes: Vec<Node>,
  functions: TemplateFunctions,
}

impl RootTemplate {
  /// Parse a root template. Every function action must name an entry of
  /// `functions`; the template must contain an `inertia_body` action.
  pub fn parse(source: &str, functions: TemplateFunctions) -> Result<Self, TemplateError> {
    let tokens = tokenize(source)?;
    let nodes = parse(tokens, &functions)?;
    Ok(Self { nodes, functions })
  }

  pub fn render(&self, head: &str, body: &str) -> String {
    let mut out = String::new();
    for node in &self.nodes {
      match node {
        Node::Text(text) => out.push_str(text),
        Node::Head => out.push_str(head),
        Node::Body => out.push_str(body),
        Node::Call { name, args } => {
          // Presence was checked at parse time.
          if let Some(f) = self.functions.get(name) {
            out.push_str(&f(args));
          }
        }
      }
    }
    out
  }
}

impl fmt::Debug for RootTemplate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RootTemplate")
      .field("nodes", &self.nodes)
      .field("functions", &self.functions.keys().collect::<Vec<_>>())
      .finish()
  }
}
