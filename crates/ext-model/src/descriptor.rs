//! Remote extension descriptors.

use serde::{Deserialize, Serialize};

use crate::dependency::ExtensionDependency;
use crate::id::ExtensionId;

/// Resolved metadata for one extension version, as declared by a remote
/// repository. Read-only to the install engine.
///
/// Scalar fields come before tables so the descriptor serializes cleanly
/// to TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteExtensionDescriptor {
    /// Extension type, used to select the side-effect handler
    /// (e.g., `"jar"`, `"xar"`).
    #[serde(rename = "type")]
    pub extension_type: String,
    /// The extension this descriptor describes.
    pub id: ExtensionId,
    /// Declared dependencies, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<ExtensionDependency>,
}

impl RemoteExtensionDescriptor {
    /// Create a descriptor with no dependencies.
    pub fn new(id: ExtensionId, extension_type: impl Into<String>) -> Self {
        Self {
            extension_type: extension_type.into(),
            id,
            dependencies: Vec::new(),
        }
    }
}
