//! Stateful trust-decision workflow on top of the raw endpoints.
//!
//! State lives in `tokio::sync::watch` channels so a presentation layer can
//! subscribe to loading, error, and data changes while requests are in
//! flight.

mod executor;
mod fetcher;
mod store;
mod upload;

pub use executor::{ActionState, TrustActionExecutor};
pub use fetcher::{CollectionFetcher, CollectionState};
pub use store::{TrustSnapshot, TrustStore};
pub use upload::{CertificateFile, UploadState, UploadSubmitter};

use async_trait::async_trait;
use std::sync::Arc;

/// Something that can re-fetch server state after a successful change
#[async_trait]
pub trait Refresh: Send + Sync {
    /// Re-fetch; outcomes are observed through the target's own state
    async fn refresh(&self);
}

#[async_trait]
impl<R: Refresh + ?Sized> Refresh for Arc<R> {
    async fn refresh(&self) {
        (**self).refresh().await;
    }
}
