use async_trait::async_trait;
use sslctx_core::{CertificateCollection, SslContextError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::Refresh;
use crate::SslContextClient;

/// Observable state of one collection
#[derive(Debug, Clone, Default)]
pub struct CollectionState {
    /// Last successfully loaded collection; kept when a later refresh fails
    pub data: Option<CertificateCollection>,
    /// A request newer than the displayed data is in flight
    pub loading: bool,
    /// Failure of the most recent applied response
    pub error: Option<Arc<SslContextError>>,
}

impl CollectionState {
    /// Returns true once a collection has been loaded
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.data.is_some()
    }
}

/// Loads one collection from its link and keeps it fresh.
///
/// Every refresh takes a ticket from a monotonic counter. A response is only
/// applied if no newer response has been applied yet, so overlapping
/// refreshes settle on the latest request instead of the slowest one.
#[derive(Clone)]
pub struct CollectionFetcher {
    inner: Arc<FetcherInner>,
}

struct FetcherInner {
    client: SslContextClient,
    link: String,
    issued: AtomicU64,
    applied: AtomicU64,
    state: watch::Sender<CollectionState>,
}

impl CollectionFetcher {
    /// Create an idle fetcher; nothing is requested until [`refresh`](Self::refresh)
    #[must_use]
    pub fn new(client: SslContextClient, link: impl Into<String>) -> Self {
        let (state, _) = watch::channel(CollectionState::default());
        Self {
            inner: Arc::new(FetcherInner {
                client,
                link: link.into(),
                issued: AtomicU64::new(0),
                applied: AtomicU64::new(0),
                state,
            }),
        }
    }

    /// Create a fetcher and load the collection once
    pub async fn load(client: SslContextClient, link: impl Into<String>) -> Self {
        let fetcher = Self::new(client, link);
        fetcher.refresh().await;
        fetcher
    }

    /// The collection link
    #[must_use]
    pub fn link(&self) -> &str {
        &self.inner.link
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> CollectionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CollectionState> {
        self.inner.state.subscribe()
    }

    /// Issue a new GET and apply its response; returns the resulting state.
    ///
    /// Concurrent calls are not deduplicated.
    pub async fn refresh(&self) -> CollectionState {
        let ticket = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_modify(|state| state.loading = true);
        debug!(link = %self.inner.link, ticket, "refreshing collection");

        let result = self
            .inner
            .client
            .certificates()
            .collection(&self.inner.link)
            .await;

        self.apply(ticket, result);
        self.state()
    }

    fn apply(&self, ticket: u64, result: sslctx_core::Result<CertificateCollection>) {
        let inner = &self.inner;
        inner.state.send_if_modified(|state| {
            if ticket <= inner.applied.load(Ordering::SeqCst) {
                debug!(link = %inner.link, ticket, "discarding stale collection response");
                return false;
            }
            inner.applied.store(ticket, Ordering::SeqCst);

            match result {
                Ok(collection) => {
                    debug!(link = %inner.link, certificates = collection.len(), "collection loaded");
                    state.data = Some(collection);
                    state.error = None;
                }
                Err(e) => {
                    warn!(link = %inner.link, error = %e, "failed to load collection");
                    state.error = Some(Arc::new(e));
                }
            }
            state.loading = ticket < inner.issued.load(Ordering::SeqCst);
            true
        });
    }
}

#[async_trait]
impl Refresh for CollectionFetcher {
    async fn refresh(&self) {
        Self::refresh(self).await;
    }
}

impl std::fmt::Debug for CollectionFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionFetcher")
            .field("link", &self.inner.link)
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}
