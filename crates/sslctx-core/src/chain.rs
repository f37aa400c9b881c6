//! Drill-down navigation through a certificate and its issuer chain.
//!
//! Entries are ordered root first: depth 0 is the root-most certificate the
//! server sent and the highest depth is the certificate that was opened.

use std::collections::HashSet;

use crate::types::Certificate;

/// One row of the chain tree
#[derive(Debug, Clone, Copy)]
pub struct ChainEntry<'a> {
    /// The certificate at this position
    pub certificate: &'a Certificate,
    /// Distance from the root
    pub depth: usize,
    /// Whether this entry is the one currently displayed
    pub selected: bool,
}

/// Selectable view over `[root, ..., leaf]`
#[derive(Debug, Clone)]
pub struct ChainNavigator {
    entries: Vec<Certificate>,
    selected: usize,
}

impl ChainNavigator {
    /// Build the navigator for `certificate`, selecting it.
    ///
    /// Embedded copies sharing a fingerprint collapse into one entry.
    #[must_use]
    pub fn new(certificate: &Certificate) -> Self {
        let mut seen = HashSet::new();
        let mut entries: Vec<Certificate> = std::iter::once(certificate)
            .chain(certificate.chain.iter())
            .filter(|c| seen.insert(c.fingerprint.clone()))
            .cloned()
            .collect();
        entries.reverse();

        let selected = entries.len() - 1;
        Self { entries, selected }
    }

    /// Entries in root-first order
    pub fn entries(&self) -> impl Iterator<Item = ChainEntry<'_>> {
        self.entries
            .iter()
            .enumerate()
            .map(move |(depth, certificate)| ChainEntry {
                certificate,
                depth,
                selected: depth == self.selected,
            })
    }

    /// Number of entries, at least one
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the opened certificate is always present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The certificate that was opened
    #[must_use]
    pub fn leaf(&self) -> &Certificate {
        &self.entries[self.entries.len() - 1]
    }

    /// The certificate whose fields are displayed
    #[must_use]
    pub fn selected(&self) -> &Certificate {
        &self.entries[self.selected]
    }

    /// Depth of the selected entry
    #[must_use]
    pub const fn selected_depth(&self) -> usize {
        self.selected
    }

    /// Returns true if `certificate` is the displayed entry
    #[must_use]
    pub fn is_selected(&self, certificate: &Certificate) -> bool {
        self.selected().same_identity(certificate)
    }

    /// Select by identity. Unknown certificates leave the selection unchanged.
    pub fn select(&mut self, certificate: &Certificate) -> bool {
        self.select_fingerprint(&certificate.fingerprint)
    }

    /// Select the entry with this fingerprint
    pub fn select_fingerprint(&mut self, fingerprint: &str) -> bool {
        match self.entries.iter().position(|c| c.fingerprint == fingerprint) {
            Some(depth) => {
                self.selected = depth;
                true
            }
            None => false,
        }
    }

    /// Select the entry at `depth`
    pub fn select_depth(&mut self, depth: usize) -> bool {
        if depth < self.entries.len() {
            self.selected = depth;
            true
        } else {
            false
        }
    }
}
