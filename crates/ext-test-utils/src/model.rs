//! Unwrap-happy model constructors for test scenarios.

use ext_model::{
    ExtensionDependency, ExtensionId, Namespace, RemoteExtensionDescriptor, Version,
};

/// Parse a version, panicking on malformed input.
pub fn version(text: &str) -> Version {
    Version::parse(text).expect("test version must parse")
}

/// Build an extension id from a name and version string.
pub fn id(name: &str, version_text: &str) -> ExtensionId {
    ExtensionId::new(name, version(version_text))
}

/// Build a namespace, panicking on invalid input.
pub fn namespace(name: &str) -> Namespace {
    Namespace::new(name).expect("test namespace must be valid")
}

/// Start building a descriptor of type `"jar"` (override with
/// [`DescriptorBuilder::of_type`]).
pub fn descriptor(name: &str, version_text: &str) -> DescriptorBuilder {
    DescriptorBuilder {
        descriptor: RemoteExtensionDescriptor::new(id(name, version_text), "jar"),
    }
}

/// Fluent builder for [`RemoteExtensionDescriptor`] fixtures.
pub struct DescriptorBuilder {
    descriptor: RemoteExtensionDescriptor,
}

impl DescriptorBuilder {
    /// Set the extension type.
    pub fn of_type(mut self, extension_type: &str) -> Self {
        self.descriptor.extension_type = extension_type.to_string();
        self
    }

    /// Append a dependency (declaration order is preserved).
    pub fn depends_on(mut self, name: &str, min_version_text: &str) -> Self {
        self.descriptor
            .dependencies
            .push(ExtensionDependency::new(name, version(min_version_text)));
        self
    }

    /// Finish the descriptor.
    pub fn build(self) -> RemoteExtensionDescriptor {
        self.descriptor
    }
}
