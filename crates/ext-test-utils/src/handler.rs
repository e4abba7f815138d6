//! Recording side-effect handler.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use ext_engine::{ExtensionHandler, HandlerError};
use ext_model::{ExtensionId, InstalledExtensionRecord, Namespace};

/// One observed handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerCall {
    Install {
        id: ExtensionId,
        namespace: Option<Namespace>,
        dependency: bool,
    },
    Upgrade {
        id: ExtensionId,
        previous: ExtensionId,
        namespace: Option<Namespace>,
    },
    Uninstall {
        id: ExtensionId,
        namespace: Option<Namespace>,
    },
}

impl HandlerCall {
    /// The extension name the call is about.
    pub fn name(&self) -> &str {
        match self {
            Self::Install { id, .. } | Self::Upgrade { id, .. } | Self::Uninstall { id, .. } => {
                &id.name
            }
        }
    }
}

/// An [`ExtensionHandler`] that records every call in order and can be
/// scripted to fail for specific extension names.
///
/// Clones share the same log, so a test can hold one clone while a
/// [`HandlerRegistry`](ext_engine::HandlerRegistry) owns another.
#[derive(Default, Clone)]
pub struct RecordingHandler {
    calls: Arc<Mutex<Vec<HandlerCall>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl RecordingHandler {
    /// Create a handler that succeeds for everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call for extension `name` fail from now on.
    pub fn fail_for(&self, name: &str) {
        lock(&self.failing).insert(name.to_string());
    }

    /// Stop failing calls for `name`.
    pub fn succeed_for(&self, name: &str) {
        lock(&self.failing).remove(name);
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<HandlerCall> {
        lock(&self.calls).clone()
    }

    /// Extension names of observed calls, in order.
    pub fn call_names(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    fn check(&self, record: &InstalledExtensionRecord) -> Result<(), HandlerError> {
        if lock(&self.failing).contains(&record.id.name) {
            return Err(HandlerError::failed(
                &record.extension_type,
                "scripted handler failure",
            ));
        }
        Ok(())
    }
}

impl ExtensionHandler for RecordingHandler {
    fn install(&self, record: &InstalledExtensionRecord) -> Result<(), HandlerError> {
        self.check(record)?;
        lock(&self.calls).push(HandlerCall::Install {
            id: record.id.clone(),
            namespace: record.namespace.clone(),
            dependency: record.dependency,
        });
        Ok(())
    }

    fn upgrade(
        &self,
        previous: &InstalledExtensionRecord,
        record: &InstalledExtensionRecord,
    ) -> Result<(), HandlerError> {
        self.check(record)?;
        lock(&self.calls).push(HandlerCall::Upgrade {
            id: record.id.clone(),
            previous: previous.id.clone(),
            namespace: record.namespace.clone(),
        });
        Ok(())
    }

    fn uninstall(&self, record: &InstalledExtensionRecord) -> Result<(), HandlerError> {
        self.check(record)?;
        lock(&self.calls).push(HandlerCall::Uninstall {
            id: record.id.clone(),
            namespace: record.namespace.clone(),
        });
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
