use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::blob::{BlobError, BlobStore, check_name};

/// Blobs as plain files in one flat directory: `{root}/{name}`.
///
/// Writes go to a hidden `.{name}.partial` file first and are renamed into
/// place once flushed, so a truncated payload never sits under a real name.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, BlobError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn blob_path(&self, name: &str) -> Result<PathBuf, BlobError> {
        check_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn write(&self, name: &str, data: Bytes) -> Result<(), BlobError> {
        let path = self.blob_path(name)?;
        let partial = self.root.join(format!(".{name}.partial"));

        let written = async {
            let mut f = fs::File::create(&partial).await?;
            f.write_all(&data).await?;
            f.sync_all().await?;
            fs::rename(&partial, &path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&partial).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Bytes, BlobError> {
        let path = self.blob_path(name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), BlobError> {
        let path = self.blob_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
