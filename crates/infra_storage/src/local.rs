//! Local-disk document store
//!
//! Stores uploads under a configured directory as `{millis}-{name}` and
//! returns a URL under the server's public uploads path. The directory is
//! created on startup if missing.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use core_kernel::{DomainPort, PortError};
use domain_loan::{DocumentStore, StoredDocument, UploadFile};

/// Document store backed by a local uploads directory
#[derive(Debug, Clone)]
pub struct LocalDiskStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDiskStore {
    /// Creates the store, ensuring the uploads directory exists
    ///
    /// `public_base_url` is the externally reachable prefix the server serves
    /// the directory under, e.g. `http://localhost:8080/uploads`.
    pub async fn create(
        root: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, PortError> {
        let root = root.into();

        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            PortError::internal(format!(
                "failed to create uploads directory {}: {e}",
                root.display()
            ))
        })?;
        info!(path = %root.display(), "Uploads directory ready");

        Ok(Self {
            root,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The directory uploads are written to
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn stored_name(file_name: &str) -> String {
        format!("{}-{}", Utc::now().timestamp_millis(), sanitize(file_name))
    }
}

impl DomainPort for LocalDiskStore {}

#[async_trait]
impl DocumentStore for LocalDiskStore {
    async fn store(&self, file: UploadFile, folder: &str) -> Result<StoredDocument, PortError> {
        let dir = self.root.join(sanitize(folder));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| PortError::internal(format!("failed to create {}: {e}", dir.display())))?;

        let name = Self::stored_name(&file.file_name);
        let path = dir.join(&name);

        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| PortError::internal(format!("failed to write {}: {e}", path.display())))?;

        debug!(path = %path.display(), bytes = file.bytes.len(), "Stored upload");

        Ok(StoredDocument {
            url: format!("{}/{}/{}", self.public_base_url, sanitize(folder), name),
        })
    }
}

/// Keeps stored names flat and shell-safe
fn sanitize(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("loan-uploads-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_sanitize_strips_paths_and_specials() {
        assert_eq!(sanitize("../../etc/passwd"), "passwd");
        assert_eq!(sanitize("pan card (1).pdf"), "pan_card__1_.pdf");
        assert_eq!(sanitize("aadhaar.pdf"), "aadhaar.pdf");
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_url() {
        let root = temp_root();
        let store = LocalDiskStore::create(&root, "http://localhost:8080/uploads/")
            .await
            .unwrap();

        let stored = store
            .store(
                UploadFile {
                    file_name: "aadhaar.pdf".to_string(),
                    content_type: Some("application/pdf".to_string()),
                    bytes: b"fake pdf".to_vec(),
                },
                "loan-documents",
            )
            .await
            .unwrap();

        assert!(stored
            .url
            .starts_with("http://localhost:8080/uploads/loan-documents/"));
        assert!(stored.url.ends_with("-aadhaar.pdf"));

        let name = stored.url.rsplit('/').next().unwrap();
        let on_disk = tokio::fs::read(root.join("loan-documents").join(name))
            .await
            .unwrap();
        assert_eq!(on_disk, b"fake pdf");

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
