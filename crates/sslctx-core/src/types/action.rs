//! Trust actions, the capabilities that permit them, and their outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::Links;
use crate::SslContextError;

/// A state-changing action on a single certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustAction {
    /// Move a rejected certificate into the trust store
    Approve,
    /// Withdraw trust from an approved certificate
    Reject,
    /// Delete a rejected certificate
    Remove,
}

/// HTTP method used to invoke an action link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMethod {
    /// POST without a body
    Post,
    /// DELETE
    Delete,
}

impl TrustAction {
    /// All actions, in display order
    pub const ALL: [Self; 3] = [Self::Approve, Self::Reject, Self::Remove];

    /// Link relation carrying this action
    #[must_use]
    pub const fn rel(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Remove => "remove",
        }
    }

    /// How the action link is invoked
    #[must_use]
    pub const fn method(self) -> ActionMethod {
        match self {
            Self::Approve | Self::Reject => ActionMethod::Post,
            Self::Remove => ActionMethod::Delete,
        }
    }

    /// Confirmation shown after the action succeeded
    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Approve => "certificate approved",
            Self::Reject => "certificate rejected",
            Self::Remove => "certificate deleted",
        }
    }
}

impl fmt::Display for TrustAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rel())
    }
}

/// Action hrefs of one certificate, extracted once from its `_links`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLinks {
    /// `approve` link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approve: Option<String>,
    /// `reject` link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject: Option<String>,
    /// `remove` link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<String>,
}

impl ActionLinks {
    /// Extract the action links from a HAL link map
    #[must_use]
    pub fn from_links(links: &Links) -> Self {
        let pick = |action: TrustAction| links.href(action.rel()).map(String::from);
        Self {
            approve: pick(TrustAction::Approve),
            reject: pick(TrustAction::Reject),
            remove: pick(TrustAction::Remove),
        }
    }

    /// The href for `action`, if the server offers it
    #[must_use]
    pub fn href(&self, action: TrustAction) -> Option<&str> {
        match action {
            TrustAction::Approve => self.approve.as_deref(),
            TrustAction::Reject => self.reject.as_deref(),
            TrustAction::Remove => self.remove.as_deref(),
        }
    }

    /// Capability flags derived from link presence
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_approve: self.approve.is_some(),
            can_reject: self.reject.is_some(),
            can_remove: self.remove.is_some(),
        }
    }
}

/// Which actions are currently legal for a certificate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// An `approve` link is present
    pub can_approve: bool,
    /// A `reject` link is present
    pub can_reject: bool,
    /// A `remove` link is present
    pub can_remove: bool,
}

impl Capabilities {
    /// Returns true if `action` is permitted
    #[must_use]
    pub const fn allows(&self, action: TrustAction) -> bool {
        match action {
            TrustAction::Approve => self.can_approve,
            TrustAction::Reject => self.can_reject,
            TrustAction::Remove => self.can_remove,
        }
    }

    /// Permitted actions, in display order
    pub fn actions(self) -> impl Iterator<Item = TrustAction> {
        TrustAction::ALL.into_iter().filter(move |a| self.allows(*a))
    }

    /// Returns true if no action is offered
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        !(self.can_approve || self.can_reject || self.can_remove)
    }
}

/// Result of a trust action or upload, handed back to the presentation layer
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// The server accepted the request and the collections were refreshed
    Success {
        /// One-shot confirmation for the user
        message: Option<String>,
    },
    /// The request was not sent or did not succeed
    Failure {
        /// Opaque cause, shown inline
        error: Arc<SslContextError>,
    },
}

impl ActionOutcome {
    /// Successful outcome with a confirmation message
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: Some(message.into()),
        }
    }

    /// Failed outcome
    #[must_use]
    pub fn failure(error: SslContextError) -> Self {
        Self::Failure {
            error: Arc::new(error),
        }
    }

    /// Returns true on success
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Confirmation message, if any
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message } => message.as_deref(),
            Self::Failure { .. } => None,
        }
    }

    /// Error, if the action failed
    #[must_use]
    pub fn error(&self) -> Option<&SslContextError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }
}
