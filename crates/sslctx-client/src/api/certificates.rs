//! Certificate collection and trust action endpoints.
//!
//! Every call here goes through a link the server handed out. Nothing builds
//! URLs from fingerprints.

use crate::SslContextClient;
use sslctx_core::{
    ActionMethod, Certificate, CertificateCollection, Result, SslContextError, TrustAction,
};
use tracing::info;

/// Uploads must be strictly smaller than this
pub const UPLOAD_LIMIT_BYTES: usize = 50_000;

/// Content type of certificate uploads
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Certificate collection and trust action endpoints
pub struct CertificateApi<'a> {
    client: &'a SslContextClient,
}

impl<'a> CertificateApi<'a> {
    pub(crate) fn new(client: &'a SslContextClient) -> Self {
        Self { client }
    }

    /// Load the collection behind `href`
    pub async fn collection(&self, href: &str) -> Result<CertificateCollection> {
        self.client.get(href).await
    }

    /// Invoke `action` through the certificate's own link.
    ///
    /// Fails with [`SslContextError::ActionNotPermitted`] without sending a
    /// request when the link is absent.
    pub async fn invoke(&self, certificate: &Certificate, action: TrustAction) -> Result<()> {
        let href = certificate
            .action_href(action)
            .ok_or(SslContextError::ActionNotPermitted(action))?;

        match action.method() {
            ActionMethod::Post => self.client.post(href).await?,
            ActionMethod::Delete => self.client.delete(href).await?,
        }

        info!(
            fingerprint = %certificate.fingerprint,
            action = %action,
            "trust action accepted"
        );
        Ok(())
    }

    /// Upload a certificate file to the `upload` link
    pub async fn upload(&self, href: &str, bytes: Vec<u8>) -> Result<()> {
        check_upload_size(bytes.len())?;
        let size = bytes.len();

        self.client.post_binary(href, bytes, OCTET_STREAM).await?;

        info!(bytes = size, "certificate uploaded");
        Ok(())
    }
}

/// Reject files at or above the upload limit
pub(crate) fn check_upload_size(size: usize) -> Result<()> {
    if size < UPLOAD_LIMIT_BYTES {
        Ok(())
    } else {
        Err(SslContextError::UploadTooLarge {
            size,
            limit: UPLOAD_LIMIT_BYTES,
        })
    }
}
