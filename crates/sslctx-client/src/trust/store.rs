use async_trait::async_trait;
use sslctx_core::{Certificate, CertificateStatus, Result, SslContextError, SslContextLinks};
use std::sync::Arc;
use tracing::debug;

use super::{CollectionFetcher, CollectionState, Refresh, TrustActionExecutor, UploadSubmitter};
use crate::SslContextClient;

/// Both collections at one moment
#[derive(Debug, Clone, Default)]
pub struct TrustSnapshot {
    /// Approved collection state
    pub approved: CollectionState,
    /// Rejected collection state
    pub rejected: CollectionState,
}

impl TrustSnapshot {
    /// State of the collection holding `status`
    #[must_use]
    pub const fn collection(&self, status: CertificateStatus) -> &CollectionState {
        match status {
            CertificateStatus::Approved => &self.approved,
            CertificateStatus::Rejected => &self.rejected,
        }
    }

    /// Find a certificate by fingerprint in either collection, chains included
    #[must_use]
    pub fn find(&self, fingerprint: &str) -> Option<&Certificate> {
        [&self.approved, &self.rejected]
            .into_iter()
            .filter_map(|state| state.data.as_ref())
            .find_map(|collection| collection.get(fingerprint))
            .or_else(|| {
                [&self.approved, &self.rejected]
                    .into_iter()
                    .filter_map(|state| state.data.as_ref())
                    .find_map(|collection| collection.find(fingerprint))
            })
    }
}

/// The approved and rejected collections, refreshed together.
///
/// A trust action always moves a certificate between these two collections,
/// so both are re-fetched concurrently whenever either may have changed.
#[derive(Clone)]
pub struct TrustStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    client: SslContextClient,
    links: SslContextLinks,
    approved: CollectionFetcher,
    rejected: CollectionFetcher,
}

impl TrustStore {
    /// Discover the feature through the index and load both collections.
    ///
    /// Returns `None` without further requests when the index carries no
    /// `sslContext` link.
    pub async fn open(client: SslContextClient) -> Result<Option<Self>> {
        let Some(links) = client.index().ssl_context().await? else {
            return Ok(None);
        };
        let store = Self::new(client, links)?;
        store.refresh_all().await;
        Ok(Some(store))
    }

    /// Create a store from known links without fetching anything
    pub fn new(client: SslContextClient, links: SslContextLinks) -> Result<Self> {
        let link = |status: CertificateStatus| {
            links
                .collection(status)
                .map(String::from)
                .ok_or_else(|| SslContextError::NotFound {
                    resource: format!("sslContext link `{status}`"),
                })
        };
        let approved = CollectionFetcher::new(client.clone(), link(CertificateStatus::Approved)?);
        let rejected = CollectionFetcher::new(client.clone(), link(CertificateStatus::Rejected)?);

        Ok(Self {
            inner: Arc::new(StoreInner {
                client,
                links,
                approved,
                rejected,
            }),
        })
    }

    /// The underlying client
    #[must_use]
    pub fn client(&self) -> &SslContextClient {
        &self.inner.client
    }

    /// Feature links the store was built from
    #[must_use]
    pub fn links(&self) -> &SslContextLinks {
        &self.inner.links
    }

    /// Approved collection
    #[must_use]
    pub fn approved(&self) -> &CollectionFetcher {
        &self.inner.approved
    }

    /// Rejected collection
    #[must_use]
    pub fn rejected(&self) -> &CollectionFetcher {
        &self.inner.rejected
    }

    /// Collection holding certificates with `status`
    #[must_use]
    pub fn collection(&self, status: CertificateStatus) -> &CollectionFetcher {
        match status {
            CertificateStatus::Approved => self.approved(),
            CertificateStatus::Rejected => self.rejected(),
        }
    }

    /// Current state of both collections
    #[must_use]
    pub fn snapshot(&self) -> TrustSnapshot {
        TrustSnapshot {
            approved: self.approved().state(),
            rejected: self.rejected().state(),
        }
    }

    /// Re-fetch both collections concurrently.
    ///
    /// Failures stay isolated: one collection may hold fresh data while the
    /// other reports an error.
    pub async fn refresh_all(&self) -> TrustSnapshot {
        debug!("refreshing approved and rejected collections");
        let (approved, rejected) = tokio::join!(self.approved().refresh(), self.rejected().refresh());
        TrustSnapshot { approved, rejected }
    }

    /// Executor for trust actions that refreshes this store
    #[must_use]
    pub fn executor(&self) -> TrustActionExecutor<Self> {
        TrustActionExecutor::for_store(self)
    }

    /// Upload submitter, or `None` if the server offers no upload link
    #[must_use]
    pub fn uploader(&self) -> Option<UploadSubmitter<Self>> {
        self.inner
            .links
            .upload
            .as_deref()
            .map(|link| UploadSubmitter::for_store(self, link))
    }
}

#[async_trait]
impl Refresh for TrustStore {
    async fn refresh(&self) {
        self.refresh_all().await;
    }
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore")
            .field("links", &self.inner.links)
            .field("approved", &self.inner.approved)
            .field("rejected", &self.inner.rejected)
            .finish()
    }
}
