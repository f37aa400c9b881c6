//! HAL link collections and the named-link resolver.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single hypermedia link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL, absolute or relative to the API base
    pub href: String,

    /// Name distinguishing members of a link array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Link {
    /// Create an unnamed link
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            name: None,
        }
    }

    /// Create a named link, as used inside link arrays
    #[must_use]
    pub fn named(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            name: Some(name.into()),
        }
    }
}

/// Value of a `_links` entry: either one link or an array of named links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkValue {
    /// `{"href": "..."}`
    Single(Link),
    /// `[{"name": "...", "href": "..."}, ...]`
    Many(Vec<Link>),
}

/// The `_links` map of a HAL resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<String, LinkValue>);

impl Links {
    /// Create an empty link map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single link under `rel`, replacing any previous value
    #[must_use]
    pub fn with(mut self, rel: impl Into<String>, href: impl Into<String>) -> Self {
        self.0.insert(rel.into(), LinkValue::Single(Link::new(href)));
        self
    }

    /// Add an array of named links under `rel`
    #[must_use]
    pub fn with_array<I>(mut self, rel: impl Into<String>, links: I) -> Self
    where
        I: IntoIterator<Item = Link>,
    {
        self.0
            .insert(rel.into(), LinkValue::Many(links.into_iter().collect()));
        self
    }

    /// Resolve the href of the single link `rel`.
    ///
    /// Absence is the normal "not permitted" signal. An array under `rel`
    /// resolves to nothing; use [`Links::named`] for those.
    #[must_use]
    pub fn href(&self, rel: &str) -> Option<&str> {
        match self.0.get(rel)? {
            LinkValue::Single(link) => Some(link.href.as_str()),
            LinkValue::Many(_) => None,
        }
    }

    /// Resolve the member called `name` inside the link array `rel`
    #[must_use]
    pub fn named(&self, rel: &str, name: &str) -> Option<&str> {
        let members: &[Link] = match self.0.get(rel)? {
            LinkValue::Single(link) => std::slice::from_ref(link),
            LinkValue::Many(links) => links,
        };
        members
            .iter()
            .find(|l| l.name.as_deref() == Some(name))
            .map(|l| l.href.as_str())
    }

    /// Returns true if any link exists under `rel`
    #[must_use]
    pub fn contains(&self, rel: &str) -> bool {
        self.0.contains_key(rel)
    }

    /// Returns true if there are no links at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
