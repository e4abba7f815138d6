//! Install/uninstall orchestration for the extension manager.
//!
//! The engine consumes four injected capabilities —
//! [`RepositoryResolver`](ext_repository::RepositoryResolver) for remote
//! metadata, [`LocalExtensionStore`](ext_repository::LocalExtensionStore)
//! for durable records, [`HandlerDispatch`] for type-specific side
//! effects, and [`EventSink`] for lifecycle notifications — plus the
//! immutable [`CoreExtensionSet`](ext_repository::CoreExtensionSet) of
//! extensions bundled with the platform.
//!
//! Concurrency contract: each `(extension, namespace)` unit of work is
//! sequential and may block on collaborator I/O. Two concurrent operations
//! on the same `(name, namespace)` key race between the decision read and
//! the commit; callers must serialize per key (the engine does not).

pub mod error;
pub mod event;
pub mod handler;
pub mod install;
pub mod uninstall;

pub use error::{InstallError, UninstallError};
pub use event::{EventSink, LifecycleEvent, NullEventSink};
pub use handler::{ExtensionHandler, HandlerDispatch, HandlerError, HandlerRegistry};
pub use install::{InstallOutcome, InstallReport, Installer};
pub use uninstall::Uninstaller;
