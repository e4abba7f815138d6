//! Dependency declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// A dependency on another extension, with minimum-version semantics.
///
/// There are no version ranges: a candidate satisfies the dependency iff its
/// version is `>= min_version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDependency {
    /// Name of the required extension.
    pub name: String,
    /// Minimum acceptable version.
    pub min_version: Version,
}

impl ExtensionDependency {
    /// Declare a dependency.
    pub fn new(name: impl Into<String>, min_version: Version) -> Self {
        Self {
            name: name.into(),
            min_version,
        }
    }

    /// Whether `candidate` satisfies this dependency.
    pub fn satisfied_by(&self, candidate: &Version) -> bool {
        *candidate >= self.min_version
    }
}

impl fmt::Display for ExtensionDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (>= {})", self.name, self.min_version)
    }
}
