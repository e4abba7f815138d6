//! Uninstall orchestration.

use std::sync::Arc;

use ext_model::{InstalledExtensionRecord, Namespace};
use ext_repository::LocalExtensionStore;

use crate::error::UninstallError;
use crate::event::{EventSink, LifecycleEvent};
use crate::handler::HandlerDispatch;

/// The uninstall orchestrator.
///
/// The handler runs first and the record is removed only on handler
/// success, so a record in the store always matches side effects the
/// handler believes it applied.
pub struct Uninstaller {
    store: Arc<dyn LocalExtensionStore>,
    handlers: Arc<dyn HandlerDispatch>,
    events: Arc<dyn EventSink>,
}

impl Uninstaller {
    pub fn new(
        store: Arc<dyn LocalExtensionStore>,
        handlers: Arc<dyn HandlerDispatch>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            handlers,
            events,
        }
    }

    /// Uninstall `name` from exactly the given scope.
    ///
    /// The scope must match the record's own scope: a root install is not
    /// removable through a namespace-scoped request (it would silently
    /// disappear from every other namespace too); target it with
    /// `namespace = None` instead.
    pub fn uninstall(
        &self,
        name: &str,
        namespace: Option<&Namespace>,
    ) -> Result<InstalledExtensionRecord, UninstallError> {
        let record = self
            .store
            .installed(name, namespace)?
            .filter(|record| record.namespace.as_ref() == namespace)
            .ok_or_else(|| UninstallError::NotInstalled {
                name: name.to_string(),
                namespace: namespace.cloned(),
            })?;

        tracing::info!(extension = %record.id, "uninstalling extension");

        self.handlers
            .uninstall(&record)
            .map_err(|source| UninstallError::Handler {
                id: record.id.clone(),
                source,
            })?;

        self.store.remove(&record.id, record.namespace.as_ref())?;
        self.events.publish(&LifecycleEvent::Uninstalled {
            record: record.clone(),
        });

        Ok(record)
    }
}
