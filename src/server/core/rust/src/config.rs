/* src/server/core/rust/src/config.rs */

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::csrf::CsrfConfig;
use crate::errors::InertiaError;
use crate::session::DEFAULT_SESSION_COOKIE;

pub const DEFAULT_SSR_URL: &str = "http://127.0.0.1:13714";

/// File form of the server settings, e.g. `inertia.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InertiaConfig {
  pub root_template: Option<PathBuf>,
  pub version: Option<String>,
  /// Derive the version from this file's checksum. Ignored when `version`
  /// is set.
  pub version_file: Option<PathBuf>,
  #[serde(default)]
  pub encrypt_history: bool,
  #[serde(default)]
  pub ssr: SsrSection,
  #[serde(default)]
  pub csrf: CsrfSection,
  #[serde(default)]
  pub session: SessionSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SsrSection {
  #[serde(default)]
  pub enabled: bool,
  #[serde(default = "default_ssr_url")]
  pub url: String,
}

impl Default for SsrSection {
  fn default() -> Self {
    Self { enabled: false, url: default_ssr_url() }
  }
}

fn default_ssr_url() -> String {
  DEFAULT_SSR_URL.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsrfSection {
  #[serde(default)]
  pub enabled: bool,
  #[serde(default)]
  pub secure: bool,
}

impl CsrfSection {
  pub fn to_config(&self) -> Option<CsrfConfig> {
    self.enabled.then_some(CsrfConfig { secure: self.secure })
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSection {
  #[serde(default = "default_cookie_name")]
  pub cookie_name: String,
}

impl Default for SessionSection {
  fn default() -> Self {
    Self { cookie_name: default_cookie_name() }
  }
}

fn default_cookie_name() -> String {
  DEFAULT_SESSION_COOKIE.to_string()
}

impl InertiaConfig {
  pub fn from_toml_str(source: &str) -> Result<Self, InertiaError> {
    let config: Self = toml::from_str(source).map_err(|e| InertiaError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, InertiaError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
      .map_err(|e| InertiaError::Config(format!("failed to read {}: {e}", path.display())))?;
    Self::from_toml_str(&source)
  }

  fn validate(&self) -> Result<(), InertiaError> {
    if self.ssr.enabled && self.ssr.url.trim().is_empty() {
      return Err(InertiaError::Config("ssr.url must not be empty when ssr is enabled".into()));
    }
    if self.session.cookie_name.trim().is_empty() {
      return Err(InertiaError::Config("session.cookie_name must not be empty".into()));
    }
    Ok(())
  }
}
