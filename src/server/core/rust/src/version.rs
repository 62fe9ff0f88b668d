/* src/server/core/rust/src/version.rs */

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::errors::InertiaError;
use crate::headers::RequestSignals;

/// Asset version derived from a file's contents, e.g. the bundler manifest.
/// Hex of the first 16 bytes of its SHA-256.
pub fn version_from_file(path: impl AsRef<Path>) -> Result<String, InertiaError> {
  let path = path.as_ref();
  let bytes = std::fs::read(path)
    .map_err(|source| InertiaError::VersionFile { path: path.to_path_buf(), source })?;
  Ok(version_from_bytes(&bytes))
}

pub fn version_from_bytes(bytes: &[u8]) -> String {
  let digest = Sha256::digest(bytes);
  hex::encode(&digest[..16])
}

/// A protocol GET carrying an asset version other than the server's. The
/// client must then do a full reload. Non-GET requests and servers without a
/// version never conflict.
pub fn is_version_conflict(method: &str, signals: &RequestSignals, server_version: &str) -> bool {
  if !signals.inertia || method != "GET" || server_version.is_empty() {
    return false;
  }
  signals.version.as_deref().is_some_and(|client| client != server_version)
}
