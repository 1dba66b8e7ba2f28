//! Local disk storage for uploaded x-ray images.
//!
//! Files are written under the configured upload directory and served
//! back as static assets under `/uploads/xrays/`.

use std::path::{Path, PathBuf};

use crate::errors::{AppError, AppResult};

/// Public URL prefix under which stored files are served.
pub const XRAY_URL_PREFIX: &str = "/uploads/xrays";

/// A file persisted to the x-ray store.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Name of the file on disk.
    pub filename: String,
    /// Public URL path to retrieve the file.
    pub url: String,
}

/// Filesystem-backed storage for x-ray uploads.
#[derive(Clone)]
pub struct XrayStorage {
    root: PathBuf,
}

impl XrayStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory files are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write upload bytes to disk under a collision-free name.
    ///
    /// The stored name combines a millisecond timestamp and a random
    /// UUID, keeping only the extension from the client-supplied name.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> AppResult<StoredFile> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::internal(format!("failed to create upload dir: {e}")))?;

        let filename = Self::storage_name(original_name);
        let path = self.root.join(&filename);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::internal(format!("failed to write upload: {e}")))?;

        Ok(StoredFile {
            url: format!("{XRAY_URL_PREFIX}/{filename}"),
            filename,
        })
    }

    /// Remove a stored file. Missing files are ignored so a delete of
    /// the database row never fails on an already-gone blob.
    pub async fn delete(&self, filename: &str) -> AppResult<()> {
        let path = self.root.join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!("failed to delete upload: {e}"))),
        }
    }

    fn storage_name(original_name: &str) -> String {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin");
        let ts = chrono::Utc::now().timestamp_millis();
        format!("{ts}-{}.{ext}", uuid::Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_name_keeps_safe_extension() {
        let name = XrayStorage::storage_name("scan.png");
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn storage_name_rejects_traversal_extension() {
        let name = XrayStorage::storage_name("../../etc/passwd");
        assert!(name.ends_with(".bin"));
    }

    #[tokio::test]
    async fn save_and_delete_roundtrip() {
        let dir = std::env::temp_dir().join(format!("xray-test-{}", uuid::Uuid::new_v4()));
        let storage = XrayStorage::new(&dir);

        let stored = storage.save("scan.png", b"fake-image").await.unwrap();
        assert!(stored.url.starts_with(XRAY_URL_PREFIX));
        assert!(dir.join(&stored.filename).exists());

        storage.delete(&stored.filename).await.unwrap();
        assert!(!dir.join(&stored.filename).exists());

        // Deleting again is a no-op.
        storage.delete(&stored.filename).await.unwrap();

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
