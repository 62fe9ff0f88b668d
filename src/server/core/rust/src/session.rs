/* src/server/core/rust/src/session.rs */

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

pub const DEFAULT_SESSION_COOKIE: &str = "inertia_session_id";
pub const SESSION_MAX_AGE_SECS: u64 = 24 * 60 * 60;
pub const ERRORS_KEY: &str = "errors";

#[derive(Debug, thiserror::Error)]
#[error("session store failed: {0}")]
pub struct SessionError(pub String);

/// Flash storage keyed by session id. A flashed value is returned by the
/// next `get` for the same key and removed.
pub trait Session: Send + Sync {
  fn flash(&self, session_id: &str, key: &str, value: Value) -> Result<(), SessionError>;
  fn get(&self, session_id: &str, key: &str) -> Result<Option<Value>, SessionError>;
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct MemorySession {
  store: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl MemorySession {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of sessions holding at least one flashed value.
  pub fn len(&self) -> usize {
    self.store.read().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl Session for MemorySession {
  fn flash(&self, session_id: &str, key: &str, value: Value) -> Result<(), SessionError> {
    let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
    store.entry(session_id.to_string()).or_default().insert(key.to_string(), value);
    Ok(())
  }

  fn get(&self, session_id: &str, key: &str) -> Result<Option<Value>, SessionError> {
    let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
    let Some(session) = store.get_mut(session_id) else {
      return Ok(None);
    };
    let value = session.remove(key);
    if session.is_empty() {
      store.remove(session_id);
    }
    Ok(value)
  }
}

/// Fresh random session id, 64 hex characters.
pub fn generate_session_id() -> String {
  hex::encode(rand::random::<[u8; 32]>())
}
