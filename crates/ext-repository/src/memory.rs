//! In-memory reference store.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use ext_model::{ExtensionId, InstalledExtensionRecord, Namespace};

use crate::error::StoreError;
use crate::store::{LocalExtensionStore, select_visible, visible_in};

/// Process-local [`LocalExtensionStore`].
///
/// Records are grouped by extension name and kept version-ascending within
/// each group. Used by embedders that do not need durability, and as the
/// baseline store in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Vec<InstalledExtensionRecord>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all namespaces.
    pub fn len(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<InstalledExtensionRecord>>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LocalExtensionStore for MemoryStore {
    fn installed(
        &self,
        name: &str,
        namespace: Option<&Namespace>,
    ) -> Result<Option<InstalledExtensionRecord>, StoreError> {
        let records = self.lock();
        Ok(records
            .get(name)
            .and_then(|group| select_visible(group, namespace))
            .cloned())
    }

    fn insert(&self, record: InstalledExtensionRecord) -> Result<(), StoreError> {
        let mut records = self.lock();
        let group = records.entry(record.id.name.clone()).or_default();

        group.retain(|existing| {
            existing.id.version != record.id.version || existing.namespace != record.namespace
        });

        let index = group
            .iter()
            .position(|existing| existing.id.version > record.id.version)
            .unwrap_or(group.len());
        group.insert(index, record);

        Ok(())
    }

    fn remove(
        &self,
        id: &ExtensionId,
        namespace: Option<&Namespace>,
    ) -> Result<bool, StoreError> {
        let mut records = self.lock();
        let Some(group) = records.get_mut(&id.name) else {
            return Ok(false);
        };

        let before = group.len();
        group.retain(|existing| {
            existing.id.version != id.version || existing.namespace.as_ref() != namespace
        });
        let removed = group.len() < before;

        if group.is_empty() {
            records.remove(&id.name);
        }

        Ok(removed)
    }

    fn list(
        &self,
        namespace: Option<&Namespace>,
    ) -> Result<Vec<InstalledExtensionRecord>, StoreError> {
        let records = self.lock();
        let mut visible: Vec<InstalledExtensionRecord> = records
            .values()
            .flatten()
            .filter(|r| visible_in(r, namespace))
            .cloned()
            .collect();
        visible.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(visible)
    }
}
