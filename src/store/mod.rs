//! Record-store access: user credentials and media metadata.

pub mod media;
pub mod users;

pub use media::MediaRepository;
pub use users::CredentialStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
