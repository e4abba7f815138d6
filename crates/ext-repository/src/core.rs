//! Registry of core extensions bundled with the running platform.

use std::collections::HashMap;

use ext_model::Version;

/// Read-only set of extensions shipped inside the host platform itself.
///
/// Core extensions can never be installed, upgraded, or removed by the
/// install engine. The set is populated once at process start from the
/// host's bundled manifest and shared immutably from then on.
///
/// A bundled version may be unknown (hosts that predate version manifests
/// register entries without one); dependency checks treat an unknown core
/// version as satisfying any requirement.
#[derive(Debug, Clone, Default)]
pub struct CoreExtensionSet {
    entries: HashMap<String, Option<Version>>,
}

impl CoreExtensionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bundled extension. Replaces any previous entry with the
    /// same name.
    pub fn register(&mut self, name: impl Into<String>, version: Option<Version>) {
        self.entries.insert(name.into(), version);
    }

    /// Whether `name` is a core extension.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The bundled version of `name`, when the entry exists and declares
    /// one.
    pub fn version_of(&self, name: &str) -> Option<&Version> {
        self.entries.get(name).and_then(|v| v.as_ref())
    }

    /// All core extension names (sorted).
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of core extensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Option<Version>)> for CoreExtensionSet {
    fn from_iter<I: IntoIterator<Item = (String, Option<Version>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
