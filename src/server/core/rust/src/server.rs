/* src/server/core/rust/src/server.rs */

use std::path::PathBuf;
use std::sync::Arc;

use inertia_engine::{DEFAULT_ROOT_TEMPLATE, RootTemplate};
use tracing::debug;

use crate::bundler::Bundler;
use crate::config::InertiaConfig;
use crate::csrf::CsrfConfig;
use crate::errors::InertiaError;
use crate::headers::RequestSignals;
use crate::pool::{DEFAULT_POOL_SIZE, PropsPool};
use crate::prop::Prop;
use crate::props::Props;
use crate::session::{DEFAULT_SESSION_COOKIE, MemorySession, Session};
use crate::ssr::{HttpSsrEngine, SsrCell, SsrEngine, SsrFactory, ssr_factory};
use crate::version::{is_version_conflict, version_from_file};

enum TemplateSource {
  Default,
  Path(PathBuf),
  Inline(String),
}

enum VersionSource {
  None,
  Static(String),
  File(PathBuf),
}

pub struct InertiaBuilder {
  bundler: Arc<dyn Bundler>,
  template: TemplateSource,
  version: VersionSource,
  ssr: Option<SsrFactory>,
  session: Option<Arc<dyn Session>>,
  session_cookie: String,
  csrf: Option<CsrfConfig>,
  encrypt_history: bool,
  shared: Props,
  pool_size: usize,
}

impl InertiaBuilder {
  fn new(bundler: Arc<dyn Bundler>) -> Self {
    Self {
      bundler,
      template: TemplateSource::Default,
      version: VersionSource::None,
      ssr: None,
      session: None,
      session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
      csrf: None,
      encrypt_history: false,
      shared: Props::new(),
      pool_size: DEFAULT_POOL_SIZE,
    }
  }

  /// Apply file settings. SSR, when enabled, talks HTTP to `ssr.url`.
  pub fn from_config(bundler: Arc<dyn Bundler>, config: &InertiaConfig) -> Self {
    let mut builder = Self::new(bundler)
      .encrypt_history(config.encrypt_history)
      .session_cookie(config.session.cookie_name.clone());
    if let Some(path) = &config.root_template {
      builder = builder.root_template_path(path.clone());
    }
    if let Some(path) = &config.version_file {
      builder = builder.version_from_file(path.clone());
    }
    if let Some(version) = &config.version {
      builder = builder.version(version.clone());
    }
    if let Some(csrf) = config.csrf.to_config() {
      builder = builder.csrf(csrf);
    }
    if config.ssr.enabled {
      let url = config.ssr.url.clone();
      builder = builder.ssr(move || {
        let engine: Arc<dyn SsrEngine> = Arc::new(HttpSsrEngine::new(&url));
        async move { Ok::<_, crate::BoxError>(engine) }
      });
    }
    builder
  }

  pub fn root_template_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.template = TemplateSource::Path(path.into());
    self
  }

  pub fn root_template(mut self, source: impl Into<String>) -> Self {
    self.template = TemplateSource::Inline(source.into());
    self
  }

  pub fn version(mut self, version: impl Into<String>) -> Self {
    self.version = VersionSource::Static(version.into());
    self
  }

  /// Hash this file at build time and use the digest as the version.
  pub fn version_from_file(mut self, path: impl Into<PathBuf>) -> Self {
    self.version = VersionSource::File(path.into());
    self
  }

  /// Enable SSR with an engine built on first use.
  pub fn ssr<F, Fut>(mut self, factory: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Arc<dyn SsrEngine>, crate::BoxError>> + Send + 'static,
  {
    self.ssr = Some(ssr_factory(factory));
    self
  }

  pub fn session(mut self, session: Arc<dyn Session>) -> Self {
    self.session = Some(session);
    self
  }

  pub fn session_cookie(mut self, name: impl Into<String>) -> Self {
    self.session_cookie = name.into();
    self
  }

  pub fn csrf(mut self, config: CsrfConfig) -> Self {
    self.csrf = Some(config);
    self
  }

  /// Default for [`crate::RenderOptions::encrypt_history`].
  pub fn encrypt_history(mut self, encrypt: bool) -> Self {
    self.encrypt_history = encrypt;
    self
  }

  /// Share a prop with every page. Handler props of the same name win.
  pub fn share(mut self, name: impl Into<String>, prop: impl Into<Prop>) -> Self {
    self.shared.insert(name, prop);
    self
  }

  /// Maximum number of idle prop buffers kept between renders.
  pub fn pool_size(mut self, size: usize) -> Self {
    self.pool_size = size;
    self
  }

  pub fn build(self) -> Result<Inertia, InertiaError> {
    let source = match self.template {
      TemplateSource::Default => DEFAULT_ROOT_TEMPLATE.to_string(),
      TemplateSource::Inline(source) => source,
      TemplateSource::Path(path) => std::fs::read_to_string(&path)
        .map_err(|source| InertiaError::TemplateFile { path, source })?,
    };
    let root_template = RootTemplate::parse(&source, self.bundler.template_functions())?;

    let version = match self.version {
      VersionSource::None => String::new(),
      VersionSource::Static(version) => version,
      VersionSource::File(path) => version_from_file(path)?,
    };

    let ssr = self.ssr.map(|factory| SsrCell::new(factory, Arc::clone(&self.bundler)));
    debug!(version = %version, ssr = ssr.is_some(), csrf = self.csrf.is_some(), "inertia ready");

    Ok(Inertia {
      inner: Arc::new(Inner {
        version,
        root_template,
        ssr,
        session: self.session.unwrap_or_else(|| Arc::new(MemorySession::new())),
        session_cookie: self.session_cookie,
        csrf: self.csrf,
        encrypt_history: self.encrypt_history,
        shared: self.shared,
        pool: PropsPool::new(self.pool_size),
      }),
    })
  }
}

pub(crate) struct Inner {
  pub(crate) version: String,
  pub(crate) root_template: RootTemplate,
  pub(crate) ssr: Option<SsrCell>,
  pub(crate) session: Arc<dyn Session>,
  pub(crate) session_cookie: String,
  pub(crate) csrf: Option<CsrfConfig>,
  pub(crate) encrypt_history: bool,
  pub(crate) shared: Props,
  pub(crate) pool: PropsPool,
}

/// Page protocol server state. Cheap to clone; clones share everything.
#[derive(Clone)]
pub struct Inertia {
  pub(crate) inner: Arc<Inner>,
}

impl Inertia {
  pub fn builder(bundler: Arc<dyn Bundler>) -> InertiaBuilder {
    InertiaBuilder::new(bundler)
  }

  /// Current asset version; empty when versioning is off.
  pub fn version(&self) -> &str {
    &self.inner.version
  }

  pub fn session(&self) -> &Arc<dyn Session> {
    &self.inner.session
  }

  pub fn session_cookie(&self) -> &str {
    &self.inner.session_cookie
  }

  pub fn csrf(&self) -> Option<CsrfConfig> {
    self.inner.csrf
  }

  pub fn ssr_enabled(&self) -> bool {
    self.inner.ssr.is_some()
  }

  pub fn shared(&self) -> &Props {
    &self.inner.shared
  }

  pub fn is_version_conflict(&self, method: &str, signals: &RequestSignals) -> bool {
    is_version_conflict(method, signals, &self.inner.version)
  }
}
