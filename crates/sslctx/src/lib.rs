//! Client and trust-decision workflow for an SSL context certificate store.
//!
//! A server records every TLS certificate chain it failed to validate on an
//! outbound connection. This crate lists those chains, lets an administrator
//! approve or reject them, and uploads certificates to trust up front.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sslctx::{SslContextClient, Credentials, TrustStore};
//!
//! #[tokio::main]
//! async fn main() -> sslctx::Result<()> {
//!     let client = SslContextClient::builder("https://scm.example.com/scm")
//!         .credentials(Credentials::basic("admin", "secret"))
//!         .build()?;
//!
//!     // Inert when the server does not expose the feature
//!     let Some(store) = TrustStore::open(client).await? else {
//!         return Ok(());
//!     };
//!
//!     let snapshot = store.snapshot();
//!     if let Some(rejected) = &snapshot.rejected.data {
//!         for cert in rejected {
//!             println!("{} ({})", cert.common_name(), cert.fingerprint);
//!         }
//!     }
//!
//!     // Approve the first rejected certificate that allows it
//!     if let Some(cert) = snapshot.rejected.data.as_ref().and_then(|c| c.iter().find(|c| c.capabilities().can_approve)) {
//!         let outcome = store.executor().approve(cert).await;
//!         println!("{:?}", outcome.message());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/sslctx/0.1.0")]

// Re-export core types
pub use sslctx_core::*;

// Re-export client and workflow
pub use sslctx_client::{
    api, trust, ActionState, CertificateFile, CollectionFetcher, CollectionState, Credentials,
    Refresh, SslContextClient, SslContextClientBuilder, TrustActionExecutor, TrustSnapshot,
    TrustStore, UploadState, UploadSubmitter,
};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
