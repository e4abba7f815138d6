//! Local extension store boundary.

use ext_model::{ExtensionId, InstalledExtensionRecord, Namespace};

use crate::error::StoreError;

/// Durable, namespace-scoped record of installed extensions.
///
/// The store is the single source of truth for "is X installed in
/// namespace Y"; the engine performs a fresh lookup immediately before
/// every install/upgrade decision. The engine assumes external mutual
/// exclusion per `(name, namespace)` key — the store itself only has to be
/// safe to share between threads, not to serialize competing
/// check-then-insert sequences.
pub trait LocalExtensionStore: Send + Sync {
    /// The record visible for `name` in `namespace`.
    ///
    /// A record installed in the exact namespace wins over a root (global)
    /// record; a root record is visible from every namespace. When more
    /// than one version is recorded for the same scope (an upgrade that
    /// never finished its cleanup), the newest version wins.
    fn installed(
        &self,
        name: &str,
        namespace: Option<&Namespace>,
    ) -> Result<Option<InstalledExtensionRecord>, StoreError>;

    /// Write a record. An existing record with the same name, version, and
    /// namespace is replaced.
    fn insert(&self, record: InstalledExtensionRecord) -> Result<(), StoreError>;

    /// Remove the record for exactly `(id, namespace)`. Returns `false`
    /// when nothing matched.
    fn remove(
        &self,
        id: &ExtensionId,
        namespace: Option<&Namespace>,
    ) -> Result<bool, StoreError>;

    /// All records visible in `namespace`, root installs included.
    fn list(
        &self,
        namespace: Option<&Namespace>,
    ) -> Result<Vec<InstalledExtensionRecord>, StoreError>;
}

/// Pick the record visible in `namespace` out of all records sharing one
/// extension name, per the [`LocalExtensionStore::installed`] contract.
///
/// Shared by the reference store implementations.
pub(crate) fn select_visible<'a>(
    records: &'a [InstalledExtensionRecord],
    namespace: Option<&Namespace>,
) -> Option<&'a InstalledExtensionRecord> {
    let exact = records
        .iter()
        .filter(|r| r.namespace.as_ref() == namespace)
        .max_by(|a, b| a.id.version.cmp(&b.id.version));

    exact.or_else(|| {
        records
            .iter()
            .filter(|r| r.is_global())
            .max_by(|a, b| a.id.version.cmp(&b.id.version))
    })
}

/// Whether a record is visible in `namespace` for listing purposes.
pub(crate) fn visible_in(record: &InstalledExtensionRecord, namespace: Option<&Namespace>) -> bool {
    record.is_global() || record.namespace.as_ref() == namespace
}
