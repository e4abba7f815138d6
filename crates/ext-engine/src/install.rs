//! Install orchestration.
//!
//! [`Installer`] turns an install request into one independent unit of
//! work per target namespace. Each unit decides between fresh install,
//! conflict, and upgrade, walks the declared dependencies depth-first in
//! declaration order, commits the record, applies side effects through the
//! handler dispatch, and publishes a lifecycle event.
//!
//! Two deliberate non-guarantees, inherited from the platform this engine
//! replaces and documented in the error taxonomy: a handler failure does
//! not roll back the committed record, and a failed dependency does not
//! roll back dependencies committed deeper in the walk.

use std::cmp::Ordering;
use std::sync::Arc;

use ext_model::{
    ExtensionDependency, ExtensionId, InstallScope, InstalledExtensionRecord, Namespace,
};
use ext_repository::{CoreExtensionSet, LocalExtensionStore, RepositoryResolver};

use crate::error::InstallError;
use crate::event::{EventSink, LifecycleEvent};
use crate::handler::HandlerDispatch;

/// Result of one per-namespace unit of work.
#[derive(Debug)]
pub struct InstallOutcome {
    /// The unit's target scope; `None` for the root scope.
    pub namespace: Option<Namespace>,
    /// The committed record, or the error that terminated the unit.
    pub result: Result<InstalledExtensionRecord, InstallError>,
}

/// Per-namespace outcomes of one install request, in scope iteration
/// order.
#[derive(Debug)]
pub struct InstallReport {
    pub outcomes: Vec<InstallOutcome>,
}

impl InstallReport {
    /// Whether every unit succeeded.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// Records committed for the requested extension, one per successful
    /// unit.
    pub fn records(&self) -> impl Iterator<Item = &InstalledExtensionRecord> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Failed units with their errors.
    pub fn errors(&self) -> impl Iterator<Item = (Option<&Namespace>, &InstallError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.namespace.as_ref(), e)))
    }
}

/// Names currently on the recursive walk of one unit, used to fail fast on
/// dependency cycles instead of recursing forever.
#[derive(Debug, Default)]
struct WalkState {
    chain: Vec<String>,
}

impl WalkState {
    /// Push `name`; `false` when the name is already on the walk.
    fn enter(&mut self, name: &str) -> bool {
        if self.chain.iter().any(|n| n == name) {
            return false;
        }
        self.chain.push(name.to_string());
        true
    }

    fn leave(&mut self) {
        self.chain.pop();
    }

    /// The walk path closed by re-entering `name`.
    fn chain_through(&self, name: &str) -> Vec<String> {
        let mut chain = self.chain.clone();
        chain.push(name.to_string());
        chain
    }
}

/// The install orchestrator.
///
/// All collaborators are injected once at wiring time. The installer
/// performs no internal parallelism and assumes external mutual exclusion
/// per `(name, namespace)` key; see the crate docs.
pub struct Installer {
    resolver: Arc<dyn RepositoryResolver>,
    store: Arc<dyn LocalExtensionStore>,
    core: Arc<CoreExtensionSet>,
    handlers: Arc<dyn HandlerDispatch>,
    events: Arc<dyn EventSink>,
}

impl Installer {
    pub fn new(
        resolver: Arc<dyn RepositoryResolver>,
        store: Arc<dyn LocalExtensionStore>,
        core: Arc<CoreExtensionSet>,
        handlers: Arc<dyn HandlerDispatch>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            resolver,
            store,
            core,
            handlers,
            events,
        }
    }

    /// Install `id` into every namespace of `scope`.
    ///
    /// Units are independent: a failure in one namespace never aborts the
    /// others, and the report carries one outcome per unit.
    pub fn install(&self, id: &ExtensionId, scope: &InstallScope) -> InstallReport {
        let outcomes = scope
            .units()
            .into_iter()
            .map(|namespace| {
                let mut walk = WalkState::default();
                InstallOutcome {
                    namespace: namespace.cloned(),
                    result: self.install_unit(id, namespace, false, &mut walk),
                }
            })
            .collect();

        InstallReport { outcomes }
    }

    /// One `(extension, namespace)` unit: decide, then install or upgrade.
    fn install_unit(
        &self,
        id: &ExtensionId,
        namespace: Option<&Namespace>,
        as_dependency: bool,
        walk: &mut WalkState,
    ) -> Result<InstalledExtensionRecord, InstallError> {
        match namespace {
            Some(ns) => tracing::info!(extension = %id, namespace = %ns, "resolving extension"),
            None => tracing::info!(extension = %id, "resolving extension"),
        }

        if self.core.contains(&id.name) {
            return Err(InstallError::CoreExtensionConflict {
                name: id.name.clone(),
            });
        }

        // Fresh read: every decision below is based on the store state at
        // this instant.
        let previous = match self.store.installed(&id.name, namespace)? {
            None => None,
            Some(existing) => match id.version.cmp(&existing.id.version) {
                Ordering::Equal => {
                    return Err(InstallError::AlreadyInstalled { id: id.clone() });
                }
                Ordering::Less => {
                    return Err(InstallError::NewerVersionPresent {
                        name: id.name.clone(),
                        installed: existing.id.version.clone(),
                        requested: id.version.clone(),
                    });
                }
                Ordering::Greater => Some(existing),
            },
        };

        if !walk.enter(&id.name) {
            return Err(InstallError::DependencyCycle {
                chain: walk.chain_through(&id.name),
            });
        }
        let result = self.install_resolved(id, namespace, as_dependency, previous, walk);
        walk.leave();
        result
    }

    fn install_resolved(
        &self,
        id: &ExtensionId,
        namespace: Option<&Namespace>,
        as_dependency: bool,
        previous: Option<InstalledExtensionRecord>,
        walk: &mut WalkState,
    ) -> Result<InstalledExtensionRecord, InstallError> {
        let descriptor = self
            .resolver
            .resolve(id)
            .map_err(|source| InstallError::ResolutionFailed {
                id: id.clone(),
                source,
            })?;

        for dependency in &descriptor.dependencies {
            self.install_dependency(id, dependency, namespace, walk)?;
        }

        let record = InstalledExtensionRecord {
            extension_type: descriptor.extension_type.clone(),
            namespace: namespace.cloned(),
            dependency: as_dependency,
            id: descriptor.id.clone(),
        };
        self.store.insert(record.clone())?;

        // Commit-then-apply: from here on the record stays even if the
        // handler fails.
        let applied = match &previous {
            None => self.handlers.install(&record),
            Some(prev) => self.handlers.upgrade(prev, &record),
        };
        if let Err(source) = applied {
            return Err(InstallError::HandlerFailed {
                id: record.id.clone(),
                source,
            });
        }

        match previous {
            Some(prev) => {
                // The new record is authoritative whether or not the
                // replaced one can be cleaned up.
                match self.store.remove(&prev.id, prev.namespace.as_ref()) {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::warn!(extension = %prev.id, "replaced record was already gone")
                    }
                    Err(e) => {
                        tracing::warn!(extension = %prev.id, error = %e, "failed to remove replaced record")
                    }
                }
                self.events.publish(&LifecycleEvent::Upgraded {
                    record: record.clone(),
                    previous: prev,
                });
            }
            None => {
                self.events
                    .publish(&LifecycleEvent::Installed {
                        record: record.clone(),
                    });
            }
        }

        Ok(record)
    }

    /// Satisfy one declared dependency, installing it if nothing covers it
    /// yet.
    fn install_dependency(
        &self,
        parent: &ExtensionId,
        dependency: &ExtensionDependency,
        namespace: Option<&Namespace>,
        walk: &mut WalkState,
    ) -> Result<(), InstallError> {
        if self.core.contains(&dependency.name) {
            if let Some(provided) = self.core.version_of(&dependency.name) {
                if !dependency.satisfied_by(provided) {
                    return Err(InstallError::IncompatibleCoreDependency {
                        name: dependency.name.clone(),
                        required: dependency.min_version.clone(),
                        provided: provided.clone(),
                    });
                }
            }
            tracing::debug!(dependency = %dependency, "dependency covered by a core extension");
            return Ok(());
        }

        if let Some(installed) = self.store.installed(&dependency.name, namespace)? {
            if dependency.satisfied_by(&installed.id.version) {
                tracing::debug!(
                    dependency = %dependency,
                    installed = %installed.id,
                    "dependency already satisfied"
                );
                return Ok(());
            }
        }

        let dependency_id =
            ExtensionId::new(dependency.name.clone(), dependency.min_version.clone());
        self.install_unit(&dependency_id, namespace, true, walk)
            .map(drop)
            .map_err(|source| InstallError::DependencyFailed {
                id: parent.clone(),
                dependency: dependency.name.clone(),
                source: Box::new(source),
            })
    }
}
