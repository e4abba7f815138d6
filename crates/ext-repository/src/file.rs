//! File-backed reference store.
//!
//! One TOML descriptor file per installed `(extension, namespace)` pair,
//! all in a flat directory. Records are loaded eagerly when the store is
//! opened and written through on every mutation, so the in-memory view and
//! the directory never drift apart within one process.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use ext_model::{ExtensionId, InstalledExtensionRecord, Namespace};

use crate::error::StoreError;
use crate::store::{LocalExtensionStore, select_visible, visible_in};

const RECORD_EXTENSION: &str = "toml";

/// Durable [`LocalExtensionStore`] keeping one descriptor file per record.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    cache: Mutex<HashMap<String, Vec<InstalledExtensionRecord>>>,
}

impl FileStore {
    /// Open (creating if needed) the store rooted at `root`.
    ///
    /// Unreadable descriptor files are skipped with a warning rather than
    /// failing the whole store, so one corrupt record cannot take down the
    /// engine.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        let mut cache: HashMap<String, Vec<InstalledExtensionRecord>> = HashMap::new();
        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            match load_record(&path) {
                Ok(record) => {
                    let group = cache.entry(record.id.name.clone()).or_default();
                    let index = group
                        .iter()
                        .position(|existing| existing.id.version > record.id.version)
                        .unwrap_or(group.len());
                    group.insert(index, record);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable record");
                }
            }
        }

        Ok(Self {
            root,
            cache: Mutex::new(cache),
        })
    }

    /// The store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<InstalledExtensionRecord>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_path(&self, id: &ExtensionId, namespace: Option<&Namespace>) -> PathBuf {
        let scope = namespace.map_or("root".to_string(), |ns| sanitize(ns.as_str()));
        let file = format!(
            "{}-{}@{}.{}",
            sanitize(&id.name),
            id.version,
            scope,
            RECORD_EXTENSION
        );
        self.root.join(file)
    }
}

impl LocalExtensionStore for FileStore {
    fn installed(
        &self,
        name: &str,
        namespace: Option<&Namespace>,
    ) -> Result<Option<InstalledExtensionRecord>, StoreError> {
        let cache = self.lock();
        Ok(cache
            .get(name)
            .and_then(|group| select_visible(group, namespace))
            .cloned())
    }

    fn insert(&self, record: InstalledExtensionRecord) -> Result<(), StoreError> {
        let text = toml::to_string(&record).map_err(|source| StoreError::RecordSerialize {
            id: record.id.clone(),
            source,
        })?;
        fs::write(self.record_path(&record.id, record.namespace.as_ref()), text)?;

        let mut cache = self.lock();
        let group = cache.entry(record.id.name.clone()).or_default();
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
        let mut cache = self.lock();
        let Some(group) = cache.get_mut(&id.name) else {
            return Ok(false);
        };

        let before = group.len();
        group.retain(|existing| {
            existing.id.version != id.version || existing.namespace.as_ref() != namespace
        });
        let removed = group.len() < before;
        if group.is_empty() {
            cache.remove(&id.name);
        }
        drop(cache);

        if removed {
            match fs::remove_file(self.record_path(id, namespace)) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(removed)
    }

    fn list(
        &self,
        namespace: Option<&Namespace>,
    ) -> Result<Vec<InstalledExtensionRecord>, StoreError> {
        let cache = self.lock();
        let mut visible: Vec<InstalledExtensionRecord> = cache
            .values()
            .flatten()
            .filter(|r| visible_in(r, namespace))
            .cloned()
            .collect();
        visible.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(visible)
    }
}

fn load_record(path: &Path) -> Result<InstalledExtensionRecord, StoreError> {
    let text = fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|source| StoreError::RecordParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Keep descriptor file names portable: anything outside `[A-Za-z0-9._-]`
/// becomes `_`.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
