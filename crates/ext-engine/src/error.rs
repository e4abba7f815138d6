use ext_model::{ExtensionId, Namespace, Version};
use ext_repository::{ResolveError, StoreError};

use crate::handler::HandlerError;

/// Errors terminating one install unit of work.
///
/// Engine errors are returned, never thrown across the public boundary;
/// recursive dependency failures keep their cause on the `source()` chain
/// so callers can tell "the requested extension conflicts" apart from "a
/// transitive dependency is broken".
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// The requested extension is bundled with the platform; core
    /// extensions are never touched by this engine.
    #[error("'{name}' is a core extension bundled with the platform and cannot be installed")]
    CoreExtensionConflict { name: String },

    /// Exactly this version is already installed in the target scope.
    #[error("extension {id} is already installed")]
    AlreadyInstalled { id: ExtensionId },

    /// A newer version is installed; downgrades are not automated.
    #[error(
        "a newer version of '{name}' is already installed ({installed}, requested {requested})"
    )]
    NewerVersionPresent {
        name: String,
        installed: Version,
        requested: Version,
    },

    /// Remote lookup failed. Retrying is the caller's call; the engine
    /// never retries on its own.
    #[error("failed to resolve extension {id}")]
    ResolutionFailed {
        id: ExtensionId,
        #[source]
        source: ResolveError,
    },

    /// The recursive dependency walk re-entered an extension that is still
    /// being installed.
    #[error("dependency cycle detected: {}", .chain.join(" -> "))]
    DependencyCycle { chain: Vec<String> },

    /// A transitive dependency could not be installed. Dependencies
    /// committed deeper in the recursion before the failure are not rolled
    /// back.
    #[error("failed to install dependency '{dependency}' of {id}")]
    DependencyFailed {
        id: ExtensionId,
        dependency: String,
        #[source]
        source: Box<InstallError>,
    },

    /// A dependency names a core extension whose bundled version is too
    /// old.
    #[error(
        "dependency '{name}' requires at least version {required} but the platform bundles {provided}"
    )]
    IncompatibleCoreDependency {
        name: String,
        required: Version,
        provided: Version,
    },

    /// The side-effect handler failed after the record was committed. The
    /// record is kept; the installed record may not reflect working state
    /// until an operator remediates.
    #[error("handler failed for extension {id}; the installed record was kept")]
    HandlerFailed {
        id: ExtensionId,
        #[source]
        source: HandlerError,
    },

    /// The local store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InstallError {
    /// Unwrap nested dependency failures down to the error that actually
    /// stopped the walk.
    pub fn deepest(&self) -> &InstallError {
        match self {
            Self::DependencyFailed { source, .. } => source.deepest(),
            other => other,
        }
    }
}

/// Errors terminating an uninstall.
#[derive(Debug, thiserror::Error)]
pub enum UninstallError {
    /// No record exists for the extension in the requested scope.
    #[error(
        "extension '{name}' is not installed in scope '{}'",
        .namespace.as_ref().map_or("root", |n| n.as_str())
    )]
    NotInstalled {
        name: String,
        namespace: Option<Namespace>,
    },

    /// The uninstall handler failed; the record is kept so the store keeps
    /// matching what the handler last applied.
    #[error("uninstall handler failed for extension {id}")]
    Handler {
        id: ExtensionId,
        #[source]
        source: HandlerError,
    },

    /// The local store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
