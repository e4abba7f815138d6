//! Extension identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// Unique identifier of one extension artifact: name plus version.
///
/// Equality and ordering compare the name first, then the version, so a
/// sorted collection of ids groups all versions of an extension together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExtensionId {
    /// Extension name (e.g., `"org.wiki:office-importer"`).
    pub name: String,
    /// Artifact version.
    pub version: Version,
}

impl ExtensionId {
    /// Create an identifier.
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}
