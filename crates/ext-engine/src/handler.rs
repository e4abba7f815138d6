//! Type-specific side-effect handlers.
//!
//! Committing a record only updates the local store; the actual effect of
//! an install — copying a jar onto the classpath, importing pages,
//! registering UI hooks — is owned by a handler selected by the
//! extension's type. [`HandlerRegistry`] is the shipped [`HandlerDispatch`]
//! that routes on `record.extension_type`.

use std::collections::HashMap;
use std::sync::Arc;

use ext_model::InstalledExtensionRecord;

/// Errors from side-effect handlers.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// No handler is registered for the extension's type.
    #[error("no handler registered for extension type '{extension_type}'")]
    UnknownType { extension_type: String },

    /// The handler ran and failed.
    #[error("handler for '{extension_type}' failed: {reason}")]
    Failed {
        extension_type: String,
        reason: String,
    },
}

impl HandlerError {
    /// Build a [`HandlerError::Failed`].
    pub fn failed(extension_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            extension_type: extension_type.into(),
            reason: reason.into(),
        }
    }
}

/// Side effects for one extension type.
///
/// Implementations may block on I/O. The engine calls `install` after the
/// record is committed, `upgrade` with both the replaced and the new
/// record, and `uninstall` before the record is removed.
pub trait ExtensionHandler: Send + Sync {
    fn install(&self, record: &InstalledExtensionRecord) -> Result<(), HandlerError>;

    fn upgrade(
        &self,
        previous: &InstalledExtensionRecord,
        record: &InstalledExtensionRecord,
    ) -> Result<(), HandlerError>;

    fn uninstall(&self, record: &InstalledExtensionRecord) -> Result<(), HandlerError>;
}

/// Routing boundary the engine invokes side effects through.
pub trait HandlerDispatch: Send + Sync {
    fn install(&self, record: &InstalledExtensionRecord) -> Result<(), HandlerError>;

    fn upgrade(
        &self,
        previous: &InstalledExtensionRecord,
        record: &InstalledExtensionRecord,
    ) -> Result<(), HandlerError>;

    fn uninstall(&self, record: &InstalledExtensionRecord) -> Result<(), HandlerError>;
}

/// [`HandlerDispatch`] routing on extension type over registered
/// [`ExtensionHandler`]s.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn ExtensionHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `extension_type`. Replaces any previous
    /// handler for the same type.
    pub fn register(
        &mut self,
        extension_type: impl Into<String>,
        handler: Arc<dyn ExtensionHandler>,
    ) {
        self.handlers.insert(extension_type.into(), handler);
    }

    /// Whether a handler is registered for `extension_type`.
    pub fn contains(&self, extension_type: &str) -> bool {
        self.handlers.contains_key(extension_type)
    }

    /// All registered extension types (sorted).
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }

    fn get(&self, extension_type: &str) -> Result<&Arc<dyn ExtensionHandler>, HandlerError> {
        self.handlers
            .get(extension_type)
            .ok_or_else(|| HandlerError::UnknownType {
                extension_type: extension_type.to_string(),
            })
    }
}

impl HandlerDispatch for HandlerRegistry {
    fn install(&self, record: &InstalledExtensionRecord) -> Result<(), HandlerError> {
        self.get(&record.extension_type)?.install(record)
    }

    fn upgrade(
        &self,
        previous: &InstalledExtensionRecord,
        record: &InstalledExtensionRecord,
    ) -> Result<(), HandlerError> {
        self.get(&record.extension_type)?.upgrade(previous, record)
    }

    fn uninstall(&self, record: &InstalledExtensionRecord) -> Result<(), HandlerError> {
        self.get(&record.extension_type)?.uninstall(record)
    }
}
