//! Opaque payload storage under generated names.
//!
//! | Backend           | Use                     |
//! |-------------------|-------------------------|
//! | `LocalBlobStore`  | Flat directory on disk  |
//! | `MemoryBlobStore` | Tests                   |

mod local;
mod memory;

pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use bytes::Bytes;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error("invalid blob name: {0}")]
    InvalidName(String),
    #[error("blob io error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes the whole payload under `name`. A name is never visible to
    /// readers until every byte has landed.
    async fn write(&self, name: &str, data: Bytes) -> Result<(), BlobError>;

    /// Returns `BlobError::NotFound` if nothing is stored under `name`.
    async fn get(&self, name: &str) -> Result<Bytes, BlobError>;

    /// Idempotent: deleting a missing blob succeeds.
    async fn delete(&self, name: &str) -> Result<(), BlobError>;

    /// Stores `data` under a fresh name carrying `original_filename`'s extension
    /// and returns that name.
    async fn put(&self, data: Bytes, original_filename: &str) -> Result<String, BlobError> {
        let name = generate_blob_name(extension_of(original_filename));
        self.write(&name, data).await?;
        Ok(name)
    }
}

/// Base64url of 16 bytes from the OS RNG, followed by `.ext` when there is one.
pub fn generate_blob_name(extension: Option<&str>) -> String {
    let mut raw = [0u8; 16];
    OsRng.fill_bytes(&mut raw);
    let stem = URL_SAFE.encode(raw);
    match extension {
        Some(ext) if !ext.is_empty() => format!("{stem}.{ext}"),
        _ => stem,
    }
}

/// The client's filename contributes only this suffix; it never names a path.
pub fn extension_of(filename: &str) -> Option<&str> {
    Path::new(filename).extension().and_then(|e| e.to_str())
}

pub(crate) fn check_name(name: &str) -> Result<(), BlobError> {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\', '\0']) {
        return Err(BlobError::InvalidName(name.to_string()));
    }
    Ok(())
}
