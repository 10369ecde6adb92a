//! A download host saving exports into a directory.

use super::{DownloadHost, ExportHandle};
use crate::errors::BridgeError;
use dashmap::DashMap;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

struct PendingContent {
    bytes: Vec<u8>,
    mime_type: String,
}

/// Saves exported files into a target directory.
///
/// Content lives in memory between `create_handle` and `revoke`. An existing
/// file is never overwritten: exporting onto a taken name fails with
/// [`BridgeError::Export`].
pub struct DirectoryDownloadHost {
    dir: PathBuf,
    next_id: AtomicU64,
    pending: DashMap<u64, PendingContent>,
}

impl DirectoryDownloadHost {
    /// Creates a host saving into `dir`, which must exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, BridgeError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(BridgeError::precondition(format!(
                "download directory '{}' does not exist",
                dir.display()
            )));
        }
        Ok(Self {
            dir,
            next_id: AtomicU64::new(1),
            pending: DashMap::new(),
        })
    }

    /// Returns the target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the number of handles not yet revoked.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.pending.len()
    }

    fn target_path(&self, file_name: &str) -> Result<PathBuf, BridgeError> {
        let is_plain = !file_name.is_empty()
            && file_name != "."
            && file_name != ".."
            && !file_name.contains(['/', '\\']);
        if !is_plain {
            return Err(BridgeError::Export(format!(
                "'{file_name}' is not a plain file name"
            )));
        }
        Ok(self.dir.join(file_name))
    }
}

impl DownloadHost for DirectoryDownloadHost {
    fn create_handle(&self, content: &[u8], mime_type: &str) -> Result<ExportHandle, BridgeError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.pending.insert(
            id,
            PendingContent {
                bytes: content.to_vec(),
                mime_type: mime_type.to_string(),
            },
        );
        Ok(ExportHandle {
            id,
            url: format!("blob:scriptbridge/{id}"),
        })
    }

    fn trigger(&self, handle: &ExportHandle, file_name: &str) -> Result<(), BridgeError> {
        let path = self.target_path(file_name)?;
        let pending = self.pending.get(&handle.id).ok_or_else(|| {
            BridgeError::Export(format!("handle {} was already revoked", handle.url))
        })?;
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(BridgeError::Export(format!(
                    "'{file_name}' already exists in the download directory"
                )));
            }
            Err(err) => return Err(err.into()),
        };
        file.write_all(&pending.bytes)?;
        debug!(
            path = %path.display(),
            mime_type = %pending.mime_type,
            "Export saved"
        );
        Ok(())
    }

    fn revoke(&self, handle: &ExportHandle) {
        self.pending.remove(&handle.id);
    }
}

impl std::fmt::Debug for DirectoryDownloadHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryDownloadHost")
            .field("dir", &self.dir)
            .field("live_handles", &self.live_handles())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ArtifactExporter;
    use std::sync::Arc;

    #[test]
    fn test_missing_directory_is_precondition() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = DirectoryDownloadHost::new(missing).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_export_writes_file_and_releases_handle() {
        let dir = tempfile::tempdir().unwrap();
        let host = Arc::new(DirectoryDownloadHost::new(dir.path()).unwrap());
        let exporter = ArtifactExporter::new(host.clone());

        exporter.export_file("esercizio.py", "print('ciao')\n").unwrap();

        let saved = std::fs::read_to_string(dir.path().join("esercizio.py")).unwrap();
        assert_eq!(saved, "print('ciao')\n");
        assert_eq!(host.live_handles(), 0);
    }

    #[test]
    fn test_multibyte_content_is_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let host = Arc::new(DirectoryDownloadHost::new(dir.path()).unwrap());
        ArtifactExporter::new(host)
            .export_file("note.txt", "perché 🐢")
            .unwrap();

        let bytes = std::fs::read(dir.path().join("note.txt")).unwrap();
        assert_eq!(bytes, "perché 🐢".as_bytes());
    }

    #[test]
    fn test_rejected_file_name_releases_handle() {
        let dir = tempfile::tempdir().unwrap();
        let host = Arc::new(DirectoryDownloadHost::new(dir.path()).unwrap());
        let exporter = ArtifactExporter::new(host.clone());

        for name in ["", "..", "../escape.txt", "a/b.txt"] {
            let err = exporter.export_file(name, "x").unwrap_err();
            assert!(matches!(err, BridgeError::Export(_)), "{name}");
        }
        assert_eq!(host.live_handles(), 0);
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("esercizio.py"), "original").unwrap();
        let host = Arc::new(DirectoryDownloadHost::new(dir.path()).unwrap());
        let exporter = ArtifactExporter::new(host.clone());

        let err = exporter.export_file("esercizio.py", "replacement").unwrap_err();

        assert!(matches!(err, BridgeError::Export(_)));
        let kept = std::fs::read_to_string(dir.path().join("esercizio.py")).unwrap();
        assert_eq!(kept, "original");
        assert_eq!(host.live_handles(), 0);
    }

    #[test]
    fn test_revoked_handle_cannot_trigger() {
        let dir = tempfile::tempdir().unwrap();
        let host = DirectoryDownloadHost::new(dir.path()).unwrap();

        let handle = host.create_handle(b"x", "text/plain").unwrap();
        host.revoke(&handle);
        assert!(host.trigger(&handle, "x.txt").is_err());
    }
}
