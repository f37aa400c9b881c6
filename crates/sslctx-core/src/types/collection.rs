use serde::{Deserialize, Serialize};

use super::{Certificate, Links};

/// A collection of certificates sharing one status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CollectionRepr", into = "CollectionRepr")]
pub struct CertificateCollection {
    /// Collection-level links (`self`)
    pub links: Links,

    /// Certificates in server order
    pub certificates: Vec<Certificate>,
}

impl CertificateCollection {
    /// Number of top-level certificates
    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// Returns true if the collection holds no certificates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Iterate over top-level certificates
    pub fn iter(&self) -> std::slice::Iter<'_, Certificate> {
        self.certificates.iter()
    }

    /// Top-level certificate with this fingerprint
    #[must_use]
    pub fn get(&self, fingerprint: &str) -> Option<&Certificate> {
        self.certificates
            .iter()
            .find(|c| c.fingerprint == fingerprint)
    }

    /// Returns true if a top-level certificate has this fingerprint
    #[must_use]
    pub fn contains(&self, fingerprint: &str) -> bool {
        self.get(fingerprint).is_some()
    }

    /// Top-level certificate or chain member with this fingerprint.
    ///
    /// Top-level entries take precedence over embedded copies.
    #[must_use]
    pub fn find(&self, fingerprint: &str) -> Option<&Certificate> {
        self.get(fingerprint).or_else(|| {
            self.certificates
                .iter()
                .find_map(|c| c.find_in_chain(fingerprint))
        })
    }

    /// Certificates ordered by most recent `timestamp` first
    #[must_use]
    pub fn newest_first(&self) -> Vec<&Certificate> {
        let mut sorted: Vec<&Certificate> = self.certificates.iter().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }
}

impl<'a> IntoIterator for &'a CertificateCollection {
    type Item = &'a Certificate;
    type IntoIter = std::slice::Iter<'a, Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CollectionRepr {
    #[serde(rename = "_links", default)]
    links: Links,
    #[serde(rename = "_embedded", default)]
    embedded: EmbeddedCertificates,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct EmbeddedCertificates {
    #[serde(default, alias = "certificates")]
    chain: Vec<Certificate>,
}

impl From<CollectionRepr> for CertificateCollection {
    fn from(repr: CollectionRepr) -> Self {
        Self {
            links: repr.links,
            certificates: repr.embedded.chain,
        }
    }
}

impl From<CertificateCollection> for CollectionRepr {
    fn from(collection: CertificateCollection) -> Self {
        Self {
            links: collection.links,
            embedded: EmbeddedCertificates {
                chain: collection.certificates,
            },
        }
    }
}
