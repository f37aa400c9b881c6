use sslctx_core::{ActionOutcome, Result, SslContextError};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{Refresh, TrustStore};
use crate::api::UPLOAD_LIMIT_BYTES;
use crate::SslContextClient;

/// Confirmation after a successful upload
const UPLOAD_SUCCESS_MESSAGE: &str = "certificate uploaded";

/// A certificate file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateFile {
    /// File name, for display
    pub name: String,
    /// Raw content, sent as-is
    pub bytes: Vec<u8>,
}

impl CertificateFile {
    /// Wrap in-memory content
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            SslContextError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { name, bytes })
    }

    /// Size in bytes
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the file is below the upload limit
    #[must_use]
    pub fn within_limit(&self) -> bool {
        self.size() < UPLOAD_LIMIT_BYTES
    }
}

/// Observable state of the upload form
#[derive(Debug, Clone, Default)]
pub struct UploadState {
    /// Currently selected file; cleared after a successful upload
    pub file: Option<CertificateFile>,
    /// A request is in flight
    pub submitting: bool,
    /// The last submit succeeded and the confirmation is still shown
    pub submitted: bool,
    /// Failure of the last submit
    pub error: Option<Arc<SslContextError>>,
}

impl UploadState {
    /// A file is selected and below the limit
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.file.as_ref().is_some_and(CertificateFile::within_limit)
    }

    /// A file is selected but at or above the limit
    #[must_use]
    pub fn is_oversized(&self) -> bool {
        self.file.as_ref().is_some_and(|f| !f.within_limit())
    }
}

/// Posts a selected certificate file to the `upload` link.
///
/// Only exists when the server offered the link; see
/// [`TrustStore::uploader`].
pub struct UploadSubmitter<R = TrustStore> {
    client: SslContextClient,
    link: String,
    refresher: R,
    state: watch::Sender<UploadState>,
}

impl<R: Refresh> UploadSubmitter<R> {
    /// Create a submitter for `link`
    pub fn new(client: SslContextClient, link: impl Into<String>, refresher: R) -> Self {
        let (state, _) = watch::channel(UploadState::default());
        Self {
            client,
            link: link.into(),
            refresher,
            state,
        }
    }

    /// The upload link
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Select a file, clearing any previous error
    pub fn select(&self, file: CertificateFile) {
        debug!(name = %file.name, size = file.size(), "certificate file selected");
        self.state.send_modify(|state| {
            state.file = Some(file);
            state.error = None;
        });
    }

    /// Drop the current selection
    pub fn clear_selection(&self) {
        self.state.send_modify(|state| state.file = None);
    }

    /// Hide the success confirmation
    pub fn dismiss_confirmation(&self) {
        self.state.send_modify(|state| state.submitted = false);
    }

    /// Upload the selected file.
    ///
    /// Missing or oversized files fail without a request. On success the
    /// refresh target is refreshed and the selection cleared unless another
    /// file was picked meanwhile; on failure the selection is kept for a
    /// retry.
    pub async fn submit(&self) -> ActionOutcome {
        let Some(file) = self.state.borrow().file.clone() else {
            return ActionOutcome::failure(SslContextError::NoFileSelected);
        };
        if !file.within_limit() {
            warn!(name = %file.name, size = file.size(), "certificate file exceeds upload limit");
            return ActionOutcome::failure(SslContextError::UploadTooLarge {
                size: file.size(),
                limit: UPLOAD_LIMIT_BYTES,
            });
        }

        self.state.send_modify(|state| {
            state.submitting = true;
            state.submitted = false;
            state.error = None;
        });

        match self.client.certificates().upload(&self.link, file.bytes.clone()).await {
            Ok(()) => {
                self.refresher.refresh().await;
                self.state.send_modify(|state| {
                    state.submitting = false;
                    state.submitted = true;
                    // Keep a file picked while the request was in flight
                    if state.file.as_ref() == Some(&file) {
                        state.file = None;
                    }
                });
                ActionOutcome::success(UPLOAD_SUCCESS_MESSAGE)
            }
            Err(e) => {
                warn!(name = %file.name, error = %e, "certificate upload failed");
                let error = Arc::new(e);
                self.state.send_modify(|state| {
                    state.submitting = false;
                    state.error = Some(Arc::clone(&error));
                });
                ActionOutcome::Failure { error }
            }
        }
    }
}

impl UploadSubmitter<TrustStore> {
    /// Submitter refreshing both collections of `store`
    #[must_use]
    pub fn for_store(store: &TrustStore, link: impl Into<String>) -> Self {
        Self::new(store.client().clone(), link, store.clone())
    }
}
