/// Errors produced while constructing model values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid version string.
    #[error("invalid version '{version}': {source}")]
    InvalidVersion {
        version: String,
        source: semver::Error,
    },

    /// Invalid namespace identifier.
    #[error("invalid namespace '{name}': {reason}")]
    InvalidNamespace { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
