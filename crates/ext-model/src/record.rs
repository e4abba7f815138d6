//! Installed-extension records.

use serde::{Deserialize, Serialize};

use crate::id::ExtensionId;
use crate::namespace::Namespace;

/// Durable record of one installed extension in one scope.
///
/// Created on a successful install, replaced (new record in, old record
/// out) on upgrade, destroyed on uninstall. A record with no namespace is a
/// root install, visible in every namespace.
///
/// Scalar fields come before tables so the record serializes cleanly to
/// TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledExtensionRecord {
    /// Extension type, retained so uninstall can dispatch to the right
    /// handler without another remote resolution.
    #[serde(rename = "type")]
    pub extension_type: String,
    /// Scope of the install; `None` for a root install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<Namespace>,
    /// True when this extension was installed to satisfy another
    /// extension's dependency rather than by direct request.
    #[serde(default)]
    pub dependency: bool,
    /// The installed extension.
    pub id: ExtensionId,
}

impl InstalledExtensionRecord {
    /// Whether this is a root install, visible in every namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_none()
    }
}
