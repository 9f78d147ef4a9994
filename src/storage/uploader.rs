// file: src/storage/uploader.rs
// description: ensures the destination container exists and uploads one csv file as a blob

use crate::error::{LoaderError, Result};
use crate::repository::ScannedFile;
use crate::storage::BlobStore;
use tracing::info;

pub struct BlobUploader<'a, B: BlobStore + ?Sized> {
    store: &'a B,
    container: &'a str,
}

impl<'a, B: BlobStore + ?Sized> BlobUploader<'a, B> {
    pub fn new(store: &'a B, container: &'a str) -> Self {
        Self { store, container }
    }

    /// Returns `true` when the container had to be created.
    pub async fn ensure_container(&self) -> Result<bool> {
        info!("Ensuring blob container {} exists...", self.container);

        if self.store.container_exists(self.container).await? {
            info!("\tBlob container {} already exists", self.container);
            return Ok(false);
        }

        info!("\tCreating {} blob container", self.container);
        self.store.create_container(self.container).await
    }

    /// Uploads the raw bytes under the file name, replacing any existing blob.
    pub async fn upload(&self, file: &ScannedFile) -> Result<u64> {
        self.ensure_container().await?;

        info!("Uploading blob for {}", file.path.display());

        let data = tokio::fs::read(&file.path)
            .await
            .map_err(|source| LoaderError::FileOperation {
                path: file.path.clone(),
                source,
            })?;
        let size = data.len() as u64;

        self.store
            .upload_blob(self.container, &file.file_name, data)
            .await?;

        Ok(size)
    }
}
