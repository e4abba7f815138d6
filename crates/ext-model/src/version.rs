//! Extension version parsing and total ordering.
//!
//! Versions are backed by semver so comparison is a strict total order
//! (antisymmetric and transitive), which the install engine relies on when
//! deciding between no-op, upgrade, and downgrade rejection.
//!
//! Parsing is lenient about a missing patch component: `"1.2"` is accepted
//! and normalized to `1.2.0`. Anything else malformed is rejected.
//!
//! # Examples
//!
//! ```
//! use ext_model::Version;
//!
//! let old = Version::parse("1.2").unwrap();
//! let new = Version::parse("1.3.0-rc.1").unwrap();
//! assert!(old < new);
//! assert_eq!(old.to_string(), "1.2.0");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A parsed, totally-ordered extension version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version(semver::Version);

impl Version {
    /// Parse a version string.
    ///
    /// Accepts full semver (`"1.2.3"`, `"2.0.0-beta.1"`) and the shorthand
    /// `major.minor` form, which gets `.0` appended.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();

        match semver::Version::parse(text) {
            Ok(v) => Ok(Self(v)),
            Err(source) => {
                // Retry with an appended patch for the major.minor shorthand.
                let with_patch = format!("{text}.0");
                match semver::Version::parse(&with_patch) {
                    Ok(v) => Ok(Self(v)),
                    Err(_) => Err(Error::InvalidVersion {
                        version: text.to_string(),
                        source,
                    }),
                }
            }
        }
    }

    /// Build a version from numeric components.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Access the underlying semver value.
    pub fn as_semver(&self) -> &semver::Version {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}
