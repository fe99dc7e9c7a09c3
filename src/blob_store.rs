//! Recipe blob storage
//!
//! Uploaded recipes are persisted through the [`BlobStorage`] trait so the
//! backend can be swapped out (and faulted in tests). The filesystem
//! implementation lays blobs out flat under a container directory that is
//! created on first write, with a JSON metadata sidecar per blob.

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Metadata attached to every stored recipe blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobMetadata {
    pub username: String,
    /// RFC 3339 UTC timestamp of the upload.
    pub upload_time: String,
    pub original_file_name: String,
    pub file_size: u64,
}

/// Result of persisting a blob.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// Durable locator for the blob.
    pub locator: String,
    /// Final blob name inside the container.
    pub name: String,
    pub size_bytes: u64,
}

/// Storage statistics for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct StorageStats {
    pub total_blobs: u64,
    pub total_bytes: u64,
}

/// Storage collaborator for recipe blobs.
///
/// Implementations create their container lazily on first write and return
/// a locator that stays valid for the life of the blob.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Persist a named blob with its metadata.
    async fn put(
        &self,
        name: &str,
        data: &[u8],
        metadata: &BlobMetadata,
    ) -> Result<StoredBlob, ApiError>;

    /// Blob count and total bytes currently stored.
    async fn stats(&self) -> Result<StorageStats, ApiError>;
}

/// Filesystem-backed blob storage.
pub struct FsBlobStore {
    root_dir: PathBuf,
    container: String,
}

impl FsBlobStore {
    /// Create a store rooted at the given directory. The container
    /// subdirectory is not created until the first write.
    pub fn new<P: AsRef<Path>>(root_dir: P, container: &str) -> Self {
        Self {
            root_dir: root_dir.as_ref().to_path_buf(),
            container: container.to_string(),
        }
    }

    fn container_dir(&self) -> PathBuf {
        self.root_dir.join(&self.container)
    }

    fn metadata_path(&self, name: &str) -> PathBuf {
        self.container_dir().join(format!("{}.meta.json", name))
    }
}

#[async_trait]
impl BlobStorage for FsBlobStore {
    async fn put(
        &self,
        name: &str,
        data: &[u8],
        metadata: &BlobMetadata,
    ) -> Result<StoredBlob, ApiError> {
        let container_dir = self.container_dir();
        fs::create_dir_all(&container_dir)
            .await
            .map_err(|e| ApiError::Storage(format!("Failed to create container: {}", e)))?;

        let blob_path = container_dir.join(name);
        fs::write(&blob_path, data)
            .await
            .map_err(|e| ApiError::Storage(format!("Failed to write blob: {}", e)))?;

        let meta_json = serde_json::to_string_pretty(metadata)
            .map_err(|e| ApiError::Storage(format!("Failed to encode metadata: {}", e)))?;
        fs::write(self.metadata_path(name), meta_json)
            .await
            .map_err(|e| ApiError::Storage(format!("Failed to write metadata: {}", e)))?;

        info!(
            container = %self.container,
            blob = %name,
            size = data.len(),
            "Stored recipe blob"
        );

        Ok(StoredBlob {
            locator: blob_path.display().to_string(),
            name: name.to_string(),
            size_bytes: data.len() as u64,
        })
    }

    async fn stats(&self) -> Result<StorageStats, ApiError> {
        let mut total_blobs = 0u64;
        let mut total_bytes = 0u64;

        // Container not created yet means nothing stored.
        if let Ok(mut entries) = fs::read_dir(self.container_dir()).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                let path = entry.path();
                if path.to_string_lossy().ends_with(".meta.json") {
                    continue;
                }
                if let Ok(meta) = fs::metadata(&path).await {
                    if meta.is_file() {
                        total_blobs += 1;
                        total_bytes += meta.len();
                    }
                }
            }
        }

        Ok(StorageStats {
            total_blobs,
            total_bytes,
        })
    }
}
