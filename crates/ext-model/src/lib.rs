//! Shared data model for the extension manager.
//!
//! Value types used across the repository and engine crates: versions and
//! extension identifiers, namespaces and install scopes, dependency
//! declarations, remote descriptors, and installed-extension records.

pub mod dependency;
pub mod descriptor;
pub mod error;
pub mod id;
pub mod namespace;
pub mod record;
pub mod version;

pub use dependency::ExtensionDependency;
pub use descriptor::RemoteExtensionDescriptor;
pub use error::{Error, Result};
pub use id::ExtensionId;
pub use namespace::{InstallScope, Namespace};
pub use record::InstalledExtensionRecord;
pub use version::Version;
