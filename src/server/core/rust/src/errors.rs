/* src/server/core/rust/src/errors.rs */

use std::io;
use std::path::PathBuf;

use inertia_engine::TemplateError;

use crate::producer::BoxError;
use crate::session::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum InertiaError {
  #[error("invalid root template: {0}")]
  Template(#[from] TemplateError),
  #[error("failed to read root template {}: {source}", .path.display())]
  TemplateFile {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("failed to read version file {}: {source}", .path.display())]
  VersionFile {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("invalid configuration: {0}")]
  Config(String),
  #[error("prop `{name}` failed: {source}")]
  Prop {
    name: String,
    #[source]
    source: BoxError,
  },
  #[error("prop task failed: {0}")]
  PropTask(String),
  #[error("ssr engine failed to start: {0}")]
  SsrStart(#[source] BoxError),
  #[error("ssr engine `{engine}` failed: {source}")]
  Ssr {
    engine: String,
    #[source]
    source: BoxError,
  },
  #[error(transparent)]
  Session(#[from] SessionError),
  #[error("failed to serialize page object: {0}")]
  Serialize(#[from] serde_json::Error),
}

impl InertiaError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::Template(_) | Self::TemplateFile { .. } => "TEMPLATE_ERROR",
      Self::VersionFile { .. } | Self::Config(_) => "CONFIG_ERROR",
      Self::Prop { .. } | Self::PropTask(_) => "PROP_ERROR",
      Self::SsrStart(_) | Self::Ssr { .. } => "SSR_ERROR",
      Self::Session(_) => "SESSION_ERROR",
      Self::Serialize(_) => "SERIALIZE_ERROR",
    }
  }

  /// Every failure surfaces as a server error; version conflicts and
  /// validation errors are responses, not errors.
  pub fn status(&self) -> u16 {
    500
  }

  /// Raised while building the server rather than during a render.
  pub fn is_setup(&self) -> bool {
    matches!(
      self,
      Self::Template(_) | Self::TemplateFile { .. } | Self::VersionFile { .. } | Self::Config(_)
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prop_error_names_the_prop() {
    let err = InertiaError::Prop { name: "users".into(), source: "db down".into() };
    assert_eq!(err.to_string(), "prop `users` failed: db down");
    assert_eq!(err.code(), "PROP_ERROR");
    assert_eq!(err.status(), 500);
    assert!(!err.is_setup());
  }

  #[test]
  fn template_errors_are_setup_errors() {
    let err = InertiaError::from(TemplateError::MissingBody);
    assert_eq!(err.code(), "TEMPLATE_ERROR");
    assert!(err.is_setup());
    assert!(err.to_string().starts_with("invalid root template"));
  }

  #[test]
  fn file_errors_show_path() {
    let err = InertiaError::VersionFile {
      path: PathBuf::from("dist/manifest.json"),
      source: io::Error::from(io::ErrorKind::NotFound),
    };
    assert!(err.to_string().contains("dist/manifest.json"));
    assert_eq!(err.code(), "CONFIG_ERROR");
  }
}
