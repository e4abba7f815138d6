//! Programmable remote repository.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use ext_model::{ExtensionId, RemoteExtensionDescriptor};
use ext_repository::{RepositoryResolver, ResolveError};

/// A [`RepositoryResolver`] answering from a scripted descriptor set.
///
/// Unpublished ids resolve to [`ResolveError::NotFound`]. Backend failures
/// can be scheduled per id with [`ScriptedResolver::fail_next`], which
/// makes the first `n` resolutions of that id fail before the scripted
/// descriptor becomes reachable again — handy for namespace-independence
/// scenarios where only the first unit should break.
#[derive(Default)]
pub struct ScriptedResolver {
    descriptors: Mutex<HashMap<ExtensionId, RemoteExtensionDescriptor>>,
    failures: Mutex<HashMap<ExtensionId, usize>>,
    resolve_log: Mutex<Vec<ExtensionId>>,
}

impl ScriptedResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a descriptor under its own id.
    pub fn publish(&self, descriptor: RemoteExtensionDescriptor) {
        lock(&self.descriptors).insert(descriptor.id.clone(), descriptor);
    }

    /// Make the next `times` resolutions of `id` fail with a backend
    /// error.
    pub fn fail_next(&self, id: ExtensionId, times: usize) {
        lock(&self.failures).insert(id, times);
    }

    /// Every id resolved so far, in call order.
    pub fn resolved_ids(&self) -> Vec<ExtensionId> {
        lock(&self.resolve_log).clone()
    }
}

impl RepositoryResolver for ScriptedResolver {
    fn resolve(&self, id: &ExtensionId) -> Result<RemoteExtensionDescriptor, ResolveError> {
        lock(&self.resolve_log).push(id.clone());

        let mut failures = lock(&self.failures);
        if let Some(remaining) = failures.get_mut(id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ResolveError::Backend {
                    id: id.clone(),
                    reason: "scripted backend failure".to_string(),
                });
            }
        }
        drop(failures);

        lock(&self.descriptors)
            .get(id)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound { id: id.clone() })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
