//! Text export as a client-initiated download.
//!
//! The download host hands out a revocable [`ExportHandle`] for the content.
//! [`ArtifactExporter`] releases that handle on every exit path, whether the
//! download was triggered or the trigger failed.

mod directory;

pub use directory::DirectoryDownloadHost;

use crate::config::BridgeConfig;
use crate::errors::BridgeError;
use std::sync::Arc;
use tracing::{debug, info};

/// A revocable reference to in-memory export content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportHandle {
    /// Host-assigned handle number.
    pub id: u64,
    /// Address the host uses to refer to the content.
    pub url: String,
}

/// The client-side save affordance.
#[cfg_attr(test, mockall::automock)]
pub trait DownloadHost: Send + Sync {
    /// Allocates a handle over `content`.
    fn create_handle(&self, content: &[u8], mime_type: &str) -> Result<ExportHandle, BridgeError>;

    /// Presents the content behind `handle` for saving as `file_name`.
    fn trigger(&self, handle: &ExportHandle, file_name: &str) -> Result<(), BridgeError>;

    /// Releases `handle`.
    fn revoke(&self, handle: &ExportHandle);
}

/// Revokes its handle when dropped.
struct ExportGuard<'a> {
    host: &'a dyn DownloadHost,
    handle: ExportHandle,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.host.revoke(&self.handle);
        debug!(handle_id = self.handle.id, "Export handle revoked");
    }
}

/// Exports text through a [`DownloadHost`].
pub struct ArtifactExporter {
    host: Arc<dyn DownloadHost>,
    mime_type: String,
}

impl ArtifactExporter {
    /// Creates an exporter writing `text/plain` content.
    #[must_use]
    pub fn new(host: Arc<dyn DownloadHost>) -> Self {
        Self::with_mime_type(host, "text/plain")
    }

    /// Creates an exporter with an explicit MIME type.
    #[must_use]
    pub fn with_mime_type(host: Arc<dyn DownloadHost>, mime_type: impl Into<String>) -> Self {
        Self {
            host,
            mime_type: mime_type.into(),
        }
    }

    /// Creates an exporter using the configured MIME type.
    #[must_use]
    pub fn from_config(host: Arc<dyn DownloadHost>, config: &BridgeConfig) -> Self {
        Self::with_mime_type(host, config.export_mime_type.clone())
    }

    /// Returns the MIME type of exported content.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Triggers a download of `content` saved as `file_name`.
    ///
    /// The handle allocated for the content is revoked before this returns.
    pub fn export_file(&self, file_name: &str, content: &str) -> Result<(), BridgeError> {
        let handle = self.host.create_handle(content.as_bytes(), &self.mime_type)?;
        let guard = ExportGuard {
            host: self.host.as_ref(),
            handle,
        };

        self.host.trigger(&guard.handle, file_name)?;
        info!(
            file_name,
            bytes = content.len(),
            handle_id = guard.handle.id,
            "Export triggered"
        );
        Ok(())
    }
}

impl std::fmt::Debug for ArtifactExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactExporter")
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn handle() -> ExportHandle {
        ExportHandle {
            id: 7,
            url: "blob:test/7".to_string(),
        }
    }

    #[test]
    fn test_export_triggers_and_revokes() {
        let mut host = MockDownloadHost::new();
        host.expect_create_handle()
            .withf(|content, mime| content == b"print(1)" && mime == "text/plain")
            .times(1)
            .returning(|_, _| Ok(handle()));
        host.expect_trigger()
            .with(eq(handle()), eq("main.py"))
            .times(1)
            .returning(|_, _| Ok(()));
        host.expect_revoke().with(eq(handle())).times(1).return_const(());

        let exporter = ArtifactExporter::new(Arc::new(host));
        exporter.export_file("main.py", "print(1)").unwrap();
    }

    #[test]
    fn test_failed_trigger_still_revokes() {
        let mut host = MockDownloadHost::new();
        host.expect_create_handle().returning(|_, _| Ok(handle()));
        host.expect_trigger()
            .returning(|_, _| Err(BridgeError::Export("dialog unavailable".to_string())));
        host.expect_revoke().with(eq(handle())).times(1).return_const(());

        let exporter = ArtifactExporter::new(Arc::new(host));
        let err = exporter.export_file("main.py", "x").unwrap_err();
        assert!(matches!(err, BridgeError::Export(_)));
    }

    #[test]
    fn test_missing_document_is_precondition() {
        let mut host = MockDownloadHost::new();
        host.expect_create_handle()
            .returning(|_, _| Err(BridgeError::precondition("no document")));
        host.expect_trigger().never();
        host.expect_revoke().never();

        let exporter = ArtifactExporter::new(Arc::new(host));
        assert!(exporter.export_file("a.txt", "x").unwrap_err().is_precondition());
    }

    #[test]
    fn test_custom_mime_type() {
        let mut host = MockDownloadHost::new();
        host.expect_create_handle()
            .withf(|_, mime| mime == "text/x-python")
            .returning(|_, _| Ok(handle()));
        host.expect_trigger().returning(|_, _| Ok(()));
        host.expect_revoke().return_const(());

        let config = BridgeConfig::default().with_export_mime_type("text/x-python");
        let exporter = ArtifactExporter::from_config(Arc::new(host), &config);
        assert_eq!(exporter.mime_type(), "text/x-python");
        exporter.export_file("a.py", "").unwrap();
    }
}
