use sslctx_core::{ActionOutcome, Certificate, SslContextError, TrustAction};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

use super::{Refresh, TrustStore};
use crate::SslContextClient;

/// Observable state of a trust action executor
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    /// An action request is in flight
    pub loading: bool,
    /// Failure of the last completed action
    pub error: Option<Arc<SslContextError>>,
}

/// Runs approve, reject, and remove through a certificate's own links.
///
/// On success the refresh target is refreshed before the outcome is
/// returned. Re-invoking while loading sends another request; `loading`
/// stays set until every request has completed.
pub struct TrustActionExecutor<R = TrustStore> {
    client: SslContextClient,
    refresher: R,
    in_flight: AtomicUsize,
    state: watch::Sender<ActionState>,
}

impl<R: Refresh> TrustActionExecutor<R> {
    /// Create an executor refreshing `refresher` after each success
    pub fn new(client: SslContextClient, refresher: R) -> Self {
        let (state, _) = watch::channel(ActionState::default());
        Self {
            client,
            refresher,
            in_flight: AtomicUsize::new(0),
            state,
        }
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> ActionState {
        self.state.borrow().clone()
    }

    /// Returns true while a request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Subscribe to state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ActionState> {
        self.state.subscribe()
    }

    /// Approve a rejected certificate
    pub async fn approve(&self, certificate: &Certificate) -> ActionOutcome {
        self.execute(certificate, TrustAction::Approve).await
    }

    /// Reject an approved certificate
    pub async fn reject(&self, certificate: &Certificate) -> ActionOutcome {
        self.execute(certificate, TrustAction::Reject).await
    }

    /// Delete a rejected certificate
    pub async fn remove(&self, certificate: &Certificate) -> ActionOutcome {
        self.execute(certificate, TrustAction::Remove).await
    }

    /// Run `action` on `certificate`.
    ///
    /// A missing link is a caller bug: the outcome is a failure and neither
    /// a request nor a state change happens.
    pub async fn execute(&self, certificate: &Certificate, action: TrustAction) -> ActionOutcome {
        if !certificate.capabilities().allows(action) {
            warn!(fingerprint = %certificate.fingerprint, %action, "action link absent");
            return ActionOutcome::failure(SslContextError::ActionNotPermitted(action));
        }

        let in_flight = self.begin();
        let result = self.client.certificates().invoke(certificate, action).await;

        match result {
            Ok(()) => {
                self.refresher.refresh().await;
                in_flight.complete(None);
                ActionOutcome::success(action.success_message())
            }
            Err(e) => {
                warn!(fingerprint = %certificate.fingerprint, %action, error = %e, "trust action failed");
                let error = Arc::new(e);
                in_flight.complete(Some(Arc::clone(&error)));
                ActionOutcome::Failure { error }
            }
        }
    }

    fn begin(&self) -> InFlight<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        InFlight {
            count: &self.in_flight,
            state: &self.state,
            completed: None,
        }
    }
}

/// One running action; dropping it releases the slot, even when the
/// `execute` future is cancelled mid-request.
struct InFlight<'a> {
    count: &'a AtomicUsize,
    state: &'a watch::Sender<ActionState>,
    completed: Option<Option<Arc<SslContextError>>>,
}

impl InFlight<'_> {
    /// Record the result; a cancelled action leaves `error` untouched
    fn complete(mut self, error: Option<Arc<SslContextError>>) {
        self.completed = Some(error);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let remaining = self.count.fetch_sub(1, Ordering::SeqCst) - 1;
        let completed = self.completed.take();
        self.state.send_modify(|state| {
            state.loading = remaining > 0;
            if let Some(error) = completed {
                state.error = error;
            }
        });
    }
}

impl TrustActionExecutor<TrustStore> {
    /// Executor refreshing both collections of `store`
    #[must_use]
    pub fn for_store(store: &TrustStore) -> Self {
        Self::new(store.client().clone(), store.clone())
    }
}
