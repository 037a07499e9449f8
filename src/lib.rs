//! medialocker: a small multi-user media store.
//!
//! Users register and log in for a bearer token; with it they upload, list,
//! fetch and delete their own files. Each file is a blob on disk plus a row in
//! SQLite, kept consistent by [`media::MediaService`].

pub mod auth;
pub mod blob;
pub mod config;
pub mod db;
pub mod errors;
pub mod media;
pub mod models;
pub mod routes;
pub mod store;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use actix_web::web::{self, Data};

use crate::auth::{Hasher, TokenIssuer};
use crate::blob::BlobStore;
use crate::config::Config;
use crate::db::Db;
use crate::media::MediaService;
use crate::store::{CredentialStore, MediaRepository};

/// Everything the handlers pull out of app data, built once at startup and
/// shared by every worker.
#[derive(Clone)]
pub struct Services {
    pub config: Data<Config>,
    pub hasher: Data<Hasher>,
    pub tokens: Data<TokenIssuer>,
    pub users: Data<CredentialStore>,
    pub media: Data<MediaService>,
}

impl Services {
    pub fn new(cfg: Config, db: Db, blobs: Arc<dyn BlobStore>) -> anyhow::Result<Self> {
        let hasher = Hasher::new(cfg.hash_memory_kib, cfg.hash_iterations, cfg.hash_parallelism)?;
        let tokens = TokenIssuer::new(cfg.signing_secret()?, cfg.token_ttl());
        let media = MediaService::new(
            MediaRepository::new(db.clone()),
            blobs,
            cfg.fs_base_url.clone(),
            cfg.max_upload_size,
        );
        Ok(Self {
            hasher: Data::new(hasher),
            tokens: Data::new(tokens),
            users: Data::new(CredentialStore::new(db)),
            media: Data::new(media),
            config: Data::new(cfg),
        })
    }

    /// Registers the shared state and every route on an app.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.hasher.clone())
            .app_data(self.tokens.clone())
            .app_data(self.users.clone())
            .app_data(self.media.clone())
            .configure(routes::configure);
    }
}
