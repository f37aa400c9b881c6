use serde::{Deserialize, Serialize};

use super::{CertificateStatus, Links};

/// Link relation under which the index advertises the SSL context feature
pub const SSL_CONTEXT_REL: &str = "sslContext";

/// The API root resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResource {
    /// Root links
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl IndexResource {
    /// Returns true if the principal may see the SSL context at all
    #[must_use]
    pub fn has_ssl_context(&self) -> bool {
        self.links.contains(SSL_CONTEXT_REL)
    }

    /// Feature links, or `None` when the feature is inert
    #[must_use]
    pub fn ssl_context(&self) -> Option<SslContextLinks> {
        self.has_ssl_context()
            .then(|| SslContextLinks::from_links(&self.links))
    }
}

/// Named members of the `sslContext` link array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SslContextLinks {
    /// Rejected collection
    pub rejected: Option<String>,
    /// Approved collection
    pub approved: Option<String>,
    /// Upload endpoint, only offered to principals who may manage
    pub upload: Option<String>,
}

impl SslContextLinks {
    /// Extract the feature links from root links
    #[must_use]
    pub fn from_links(links: &Links) -> Self {
        let pick = |name: &str| links.named(SSL_CONTEXT_REL, name).map(String::from);
        Self {
            rejected: pick("rejected"),
            approved: pick("approved"),
            upload: pick("upload"),
        }
    }

    /// Collection link for the given status
    #[must_use]
    pub fn collection(&self, status: CertificateStatus) -> Option<&str> {
        match status {
            CertificateStatus::Approved => self.approved.as_deref(),
            CertificateStatus::Rejected => self.rejected.as_deref(),
        }
    }
}
