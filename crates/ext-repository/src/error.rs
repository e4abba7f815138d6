use std::path::PathBuf;

use ext_model::ExtensionId;

/// Errors from remote repository resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The extension is not known to any configured remote repository.
    #[error("extension {id} was not found in any remote repository")]
    NotFound { id: ExtensionId },

    /// The remote repository could not be queried (transport failure,
    /// malformed response, ...).
    #[error("failed to query remote repository for {id}: {reason}")]
    Backend { id: ExtensionId, reason: String },
}

/// Errors from the local extension store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error reading or writing store state.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A persisted record could not be parsed.
    #[error("failed to parse installed-extension record {path}: {source}")]
    RecordParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A record could not be serialized for persistence.
    #[error("failed to serialize installed-extension record for {id}: {source}")]
    RecordSerialize {
        id: ExtensionId,
        source: toml::ser::Error,
    },
}
