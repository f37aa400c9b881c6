use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{parse_common_name, ActionLinks, Capabilities, Links, TrustAction};

/// Hash of a certificate's DER encoding, its identity key
pub type Fingerprint = String;

/// Trust status of a stored certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertificateStatus {
    /// Part of the trust store
    Approved,
    /// Observed and refused
    Rejected,
}

impl CertificateStatus {
    /// Lowercase name, matching the collection link names
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a certificate was rejected during the TLS handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificateError {
    /// Issuer not in the trust store
    #[serde(rename = "CERTIFICATE_UNKNOWN", alias = "UNKNOWN")]
    Unknown,
    /// Validity window has passed
    #[serde(rename = "CERTIFICATE_EXPIRED", alias = "EXPIRED")]
    Expired,
    /// Validity window has not started
    #[serde(rename = "CERTIFICATE_NOT_YET_VALID", alias = "NOT_YET_VALID")]
    NotYetValid,
    /// Revoked by its issuer
    #[serde(rename = "CERTIFICATE_REVOKED", alias = "REVOKED")]
    Revoked,
}

impl CertificateError {
    /// Wire name of the error code
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unknown => "CERTIFICATE_UNKNOWN",
            Self::Expired => "CERTIFICATE_EXPIRED",
            Self::NotYetValid => "CERTIFICATE_NOT_YET_VALID",
            Self::Revoked => "CERTIFICATE_REVOKED",
        }
    }
}

impl fmt::Display for CertificateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An X.509 certificate as recorded by the server.
///
/// Certificates are read-only snapshots. Their status only changes by
/// invoking one of their action links and fetching the collections again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CertificateRepr", into = "CertificateRepr")]
pub struct Certificate {
    /// Identity key
    pub fingerprint: Fingerprint,

    /// Subject distinguished name
    pub subject_dn: String,

    /// Issuer distinguished name
    pub issuer_dn: String,

    /// Start of the validity window
    pub not_before: DateTime<Utc>,

    /// End of the validity window
    pub not_after: DateTime<Utc>,

    /// Signature algorithm, opaque
    pub sign_alg: String,

    /// When the server recorded the certificate or its last transition
    pub timestamp: DateTime<Utc>,

    /// Approved or rejected
    pub status: CertificateStatus,

    /// Rejection reason, only set for rejected certificates
    pub error: Option<CertificateError>,

    /// Entered the trust store via manual upload
    pub uploaded: bool,

    /// Fingerprint of the issuing certificate, if the chain is known
    pub parent: Option<Fingerprint>,

    /// Raw `_links` of this instance
    pub links: Links,

    /// Action hrefs, derived from `links` when parsed
    pub actions: ActionLinks,

    /// Issuer chain, issuer of this certificate first
    pub chain: Vec<Certificate>,
}

impl Certificate {
    /// Display name taken from the subject DN
    #[must_use]
    pub fn common_name(&self) -> &str {
        parse_common_name(&self.subject_dn)
    }

    /// Display name of the issuer
    #[must_use]
    pub fn issuer_common_name(&self) -> &str {
        parse_common_name(&self.issuer_dn)
    }

    /// Which actions the server currently offers
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.actions.capabilities()
    }

    /// Href for `action`, absent when not permitted
    #[must_use]
    pub fn action_href(&self, action: TrustAction) -> Option<&str> {
        self.actions.href(action)
    }

    /// Returns true for approved certificates
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == CertificateStatus::Approved
    }

    /// Returns true if `other` is the same logical certificate
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }

    /// This certificate and its chain, root first and this certificate last
    #[must_use]
    pub fn chain_root_first(&self) -> Vec<&Self> {
        std::iter::once(self).chain(self.chain.iter()).rev().collect()
    }

    /// Find this certificate or a chain member by fingerprint
    #[must_use]
    pub fn find_in_chain(&self, fingerprint: &str) -> Option<&Self> {
        std::iter::once(self)
            .chain(self.chain.iter())
            .find(|c| c.fingerprint == fingerprint)
    }
}

/// HAL wire shape of a certificate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CertificateRepr {
    fingerprint: String,
    #[serde(rename = "subjectDN")]
    subject_dn: String,
    #[serde(rename = "issuerDN")]
    issuer_dn: String,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    #[serde(default)]
    sign_alg: String,
    timestamp: DateTime<Utc>,
    status: CertificateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<CertificateError>,
    #[serde(default)]
    uploaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    #[serde(rename = "_links", default)]
    links: Links,
    #[serde(rename = "_embedded", default)]
    embedded: EmbeddedChain,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EmbeddedChain {
    #[serde(default)]
    chain: Vec<Certificate>,
}

impl From<CertificateRepr> for Certificate {
    fn from(repr: CertificateRepr) -> Self {
        let actions = ActionLinks::from_links(&repr.links);
        Self {
            fingerprint: repr.fingerprint,
            subject_dn: repr.subject_dn,
            issuer_dn: repr.issuer_dn,
            not_before: repr.not_before,
            not_after: repr.not_after,
            sign_alg: repr.sign_alg,
            timestamp: repr.timestamp,
            status: repr.status,
            error: repr.error,
            uploaded: repr.uploaded,
            parent: repr.parent,
            links: repr.links,
            actions,
            chain: repr.embedded.chain,
        }
    }
}

impl From<Certificate> for CertificateRepr {
    fn from(cert: Certificate) -> Self {
        Self {
            fingerprint: cert.fingerprint,
            subject_dn: cert.subject_dn,
            issuer_dn: cert.issuer_dn,
            not_before: cert.not_before,
            not_after: cert.not_after,
            sign_alg: cert.sign_alg,
            timestamp: cert.timestamp,
            status: cert.status,
            error: cert.error,
            uploaded: cert.uploaded,
            parent: cert.parent,
            links: cert.links,
            embedded: EmbeddedChain { chain: cert.chain },
        }
    }
}
