//! Upload and delete across the two resources a media item lives in: the
//! blob and its record.
//!
//! The record store and the blob store share no transaction, so each
//! operation orders its steps such that a failure can only ever leave an
//! unreferenced blob behind, never a record pointing at nothing.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

use crate::blob::{BlobError, BlobStore};
use crate::models::{MediaDetail, MediaRecord, MediaSummary, UploadedMedia};
use crate::store::{MediaRepository, StoreError};

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("upload exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("media not found")]
    NotFound,
    #[error(transparent)]
    Blob(#[from] BlobError),
    #[error(transparent)]
    Store(StoreError),
    #[error("commit task ended before finishing")]
    Interrupted,
}

impl From<StoreError> for MediaError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => MediaError::NotFound,
            other => MediaError::Store(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub data: Bytes,
    /// Client-supplied name; only its extension reaches the blob store.
    pub filename: String,
    pub mime_type: String,
}

#[derive(Clone)]
pub struct MediaService {
    repo: MediaRepository,
    blobs: Arc<dyn BlobStore>,
    base_url: String,
    max_upload_size: usize,
}

impl MediaService {
    pub fn new(
        repo: MediaRepository,
        blobs: Arc<dyn BlobStore>,
        base_url: impl Into<String>,
        max_upload_size: usize,
    ) -> Self {
        Self {
            repo,
            blobs,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_upload_size,
        }
    }

    pub fn max_upload_size(&self) -> usize {
        self.max_upload_size
    }

    pub fn public_url(&self, blob_name: &str) -> String {
        format!("{}/{}", self.base_url, blob_name)
    }

    /// Blob first, record second. The pair runs on its own task so a client
    /// that goes away mid-request cannot stop it between the two steps.
    pub async fn upload(&self, user_id: i64, upload: Upload) -> Result<UploadedMedia, MediaError> {
        if upload.data.len() > self.max_upload_size {
            return Err(MediaError::TooLarge { limit: self.max_upload_size });
        }
        let svc = self.clone();
        tokio::spawn(async move { svc.commit(user_id, upload).await })
            .await
            .map_err(|_| MediaError::Interrupted)?
    }

    async fn commit(&self, user_id: i64, upload: Upload) -> Result<UploadedMedia, MediaError> {
        let blob_name = self.blobs.put(upload.data, &upload.filename).await?;

        // No cleanup on failure: the insert may have committed before the error
        // surfaced, and removing the blob then would strand the record.
        let media_id = match self
            .repo
            .insert(user_id, &blob_name, &upload.mime_type, &upload.filename)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                log::warn!("blob {blob_name} left without a record: {e}");
                return Err(e.into());
            }
        };

        Ok(UploadedMedia {
            media_id,
            url: self.public_url(&blob_name),
            filename: blob_name,
            mime_type: upload.mime_type,
            media_name: upload.filename,
        })
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<MediaSummary>, MediaError> {
        let records = self.repo.list_for_user(user_id).await?;
        Ok(records.into_iter().map(MediaSummary::from).collect())
    }

    pub async fn get(&self, user_id: i64, id: i64) -> Result<MediaDetail, MediaError> {
        let record = self.repo.get_by_id_for_user(id, user_id).await?;
        let url = self.public_url(&record.filename);
        Ok(record.into_detail(url))
    }

    /// Record first; once it is gone the item is deleted as far as anyone can
    /// observe, so a failed blob removal is only logged.
    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), MediaError> {
        let record = self.repo.get_by_id_for_user(id, user_id).await?;
        self.repo.delete_by_id(record.id).await?;

        if let Err(e) = self.blobs.delete(&record.filename).await {
            log::warn!("failed to delete blob {} for media {}: {e}", record.filename, record.id);
        }
        Ok(())
    }

    /// Serves a blob only while a record references it.
    pub async fn open(&self, blob_name: &str) -> Result<(MediaRecord, Bytes), MediaError> {
        let record = self.repo.get_by_blob_name(blob_name).await?;
        let data = match self.blobs.get(&record.filename).await {
            Ok(data) => data,
            Err(BlobError::NotFound(name)) => {
                log::error!("media {} references missing blob {name}", record.id);
                return Err(MediaError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };
        Ok((record, data))
    }
}
