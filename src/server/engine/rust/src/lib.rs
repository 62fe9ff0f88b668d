/* src/server/engine/rust/src/lib.rs */

pub mod escape;
pub mod shell;
pub mod template;

// Public API re-exports
pub use escape::{ascii_escape_json, escape_html};
pub use shell::{APP_ELEMENT_ID, fallback_body, join_head};
pub use template::{
  DEFAULT_ROOT_TEMPLATE, RootTemplate, TemplateError, TemplateFn, TemplateFunctions,
};
