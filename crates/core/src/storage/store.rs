//! File system artifact store.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use super::error::StorageError;

/// Manages the two on-disk areas a conversion touches: the upload
/// holding area (request-scoped, always cleaned up) and the output area
/// (retained for retrieval).
///
/// Every allocated path carries a random component, so concurrent
/// requests never collide and output names never leak the original
/// filename.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    uploads_dir: PathBuf,
    output_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(uploads_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Creates both storage areas if they do not exist yet.
    pub async fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.uploads_dir).await?;
        fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Allocates a unique path in the upload holding area.
    ///
    /// The original name is kept as a suffix for debuggability but is
    /// reduced to its final path component first, so a hostile filename
    /// cannot escape the holding area.
    pub fn allocate_upload_slot(&self, original_name: &str) -> PathBuf {
        let tag = Uuid::new_v4().simple().to_string();
        let safe_name = Path::new(original_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        self.uploads_dir.join(format!("{}-{}", &tag[..16], safe_name))
    }

    /// Allocates a unique output slot tagged with the target format's
    /// extension. Returns the opaque artifact id and the full path.
    pub fn allocate_output_slot(&self, target_format: &str) -> (String, PathBuf) {
        let artifact_id = format!(
            "{}.{}",
            Uuid::new_v4().simple(),
            target_format.to_ascii_lowercase()
        );
        let path = self.output_dir.join(&artifact_id);
        (artifact_id, path)
    }

    /// Deletes an uploaded file. Idempotent: deleting an already-absent
    /// file is not an error. Other failures are logged and swallowed so
    /// cleanup never masks the conversion outcome.
    pub async fn release_upload(&self, path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to remove uploaded file");
            }
        }
    }

    /// Stats a produced artifact for reporting. The file missing despite
    /// a reported success is a contract violation.
    pub async fn finalize_output(&self, path: &Path) -> Result<u64, StorageError> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::MissingArtifact {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Best-effort removal of an output file, used when a backend fails
    /// after writing partial data.
    pub async fn discard_output(&self, path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to remove partial output");
            }
        }
    }

    /// Resolves an artifact id to its path in the output area,
    /// rejecting anything that is not a plain file name.
    pub fn output_file(&self, artifact_id: &str) -> Result<PathBuf, StorageError> {
        let valid = !artifact_id.is_empty()
            && !artifact_id.contains(['/', '\\'])
            && artifact_id != "."
            && artifact_id != "..";
        if !valid {
            return Err(StorageError::InvalidArtifactId {
                id: artifact_id.to_string(),
            });
        }
        Ok(self.output_dir.join(artifact_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> ArtifactStore {
        ArtifactStore::new(dir.path().join("uploads"), dir.path().join("public"))
    }

    #[tokio::test]
    async fn test_init_creates_directories() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init().await.unwrap();
        assert!(store.uploads_dir().is_dir());
        assert!(store.output_dir().is_dir());
        // init is idempotent
        store.init().await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_slots_are_unique() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let a = store.allocate_upload_slot("photo.png");
        let b = store.allocate_upload_slot("photo.png");
        assert_ne!(a, b);
        assert!(a.starts_with(store.uploads_dir()));
    }

    #[tokio::test]
    async fn test_upload_slot_strips_path_components() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let slot = store.allocate_upload_slot("../../etc/passwd");
        assert!(slot.starts_with(store.uploads_dir()));
        assert!(slot.to_string_lossy().ends_with("passwd"));
    }

    #[tokio::test]
    async fn test_output_slot_extension() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let (id, path) = store.allocate_output_slot("WEBP");
        assert!(id.ends_with(".webp"));
        assert_eq!(path, store.output_dir().join(&id));

        let (other, _) = store.allocate_output_slot("WEBP");
        assert_ne!(id, other);
    }

    #[tokio::test]
    async fn test_release_upload_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init().await.unwrap();

        let path = store.allocate_upload_slot("file.png");
        tokio::fs::write(&path, b"data").await.unwrap();

        store.release_upload(&path).await;
        assert!(!path.exists());
        // second release of the same path is a no-op
        store.release_upload(&path).await;
    }

    #[tokio::test]
    async fn test_finalize_output_reports_size() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init().await.unwrap();

        let (_, path) = store.allocate_output_slot("png");
        tokio::fs::write(&path, vec![0u8; 128]).await.unwrap();
        assert_eq!(store.finalize_output(&path).await.unwrap(), 128);
    }

    #[tokio::test]
    async fn test_finalize_output_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init().await.unwrap();

        let (_, path) = store.allocate_output_slot("png");
        let err = store.finalize_output(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::MissingArtifact { .. }));
    }

    #[tokio::test]
    async fn test_output_file_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.output_file("../secrets.txt").is_err());
        assert!(store.output_file("a/b.png").is_err());
        assert!(store.output_file("").is_err());
        assert!(store.output_file("..").is_err());
        assert!(store.output_file("abc123.png").is_ok());
    }
}
