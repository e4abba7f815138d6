//! Installation scopes.
//!
//! A [`Namespace`] identifies one sub-wiki/tenant. Records and lookups use
//! `Option<Namespace>`: `None` is the root scope, whose installs are visible
//! in every namespace. [`InstallScope`] is the request-side form of the same
//! idea — either the root scope or an explicit namespace set.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An opaque, non-empty scope identifier (e.g., a sub-wiki key).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Create a namespace. The identifier must not be empty or blank.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidNamespace {
                name,
                reason: "namespace must not be empty".to_string(),
            });
        }
        Ok(Self(name))
    }

    /// The namespace identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Namespace {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(namespace: Namespace) -> Self {
        namespace.0
    }
}

/// Where an install request applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallScope {
    /// The root scope: one unit of work, visible in every namespace.
    Root,
    /// One independent unit of work per listed namespace.
    Namespaces(BTreeSet<Namespace>),
}

impl InstallScope {
    /// Scope over a single namespace.
    pub fn single(namespace: Namespace) -> Self {
        Self::Namespaces(BTreeSet::from([namespace]))
    }

    /// The per-namespace units this scope expands to, in deterministic
    /// order. The root scope is a single `None` unit.
    pub fn units(&self) -> Vec<Option<&Namespace>> {
        match self {
            Self::Root => vec![None],
            Self::Namespaces(set) => set.iter().map(Some).collect(),
        }
    }
}

impl FromIterator<Namespace> for InstallScope {
    fn from_iter<I: IntoIterator<Item = Namespace>>(iter: I) -> Self {
        Self::Namespaces(iter.into_iter().collect())
    }
}
