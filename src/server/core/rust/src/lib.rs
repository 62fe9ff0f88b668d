/* src/server/core/rust/src/lib.rs */

pub mod bundler;
pub mod config;
pub mod csrf;
pub mod errors;
pub mod headers;
pub mod page;
pub mod pool;
pub mod precognition;
pub mod process;
pub mod producer;
pub mod prop;
pub mod props;
pub mod redirect;
pub mod render;
pub mod server;
pub mod session;
pub mod ssr;
pub mod state;
pub mod version;

// Re-exports for ergonomic use
pub use bundler::{Bundler, NoBundler};
pub use config::InertiaConfig;
pub use csrf::CsrfConfig;
pub use errors::InertiaError;
pub use headers::{MergeIntent, Negotiation, RequestSignals};
pub use inertia_engine::{RootTemplate, TemplateError, TemplateFn, TemplateFunctions};
pub use page::{OnceEntry, PageObject, RenderOptions, ScrollEntry};
pub use pool::{PooledProps, ProcessedProps, PropsPool};
pub use process::process_props;
pub use producer::{BoxError, BoxFuture, PropCtx, PropFn};
pub use prop::{DeferredProp, MergeProp, OnceProp, Prop, Resolution, ScrollMetadata, ScrollProp};
pub use props::Props;
pub use render::{PageRequest, Rendered};
pub use server::{Inertia, InertiaBuilder};
pub use session::{MemorySession, Session, SessionError};
pub use ssr::{HttpSsrEngine, RenderedPage, SsrCell, SsrEngine, SsrFactory};
pub use state::RequestState;
pub use version::version_from_file;
