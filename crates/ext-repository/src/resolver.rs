//! Remote repository resolution boundary.

use ext_model::{ExtensionId, RemoteExtensionDescriptor};

use crate::error::ResolveError;

/// Resolves an extension identifier against one or more remote
/// repositories.
///
/// Implementations own transport, repository ordering, and artifact
/// formats; the install engine only consumes the returned descriptor.
/// Calls may block on network I/O. The engine never retries — a failed
/// resolution is terminal for the requesting unit of work.
pub trait RepositoryResolver: Send + Sync {
    /// Resolve `id` to its declared metadata.
    fn resolve(&self, id: &ExtensionId) -> Result<RemoteExtensionDescriptor, ResolveError>;
}
