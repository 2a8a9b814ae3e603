use thiserror::Error;

use crate::version::VersionSet;

pub type Result<T> = std::result::Result<T, Error>;

/// The error taxonomy of the resolution core.
///
/// `Contradiction` is intentionally absent here: it is the engine's private
/// backtrack signal (see [`crate::assignment`]) and never escapes to a caller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Version parsing error: {0}")]
    SemVer(#[from] semver::Error),

    #[error("No version of '{id}' satisfies {requirement}\n\n\
             Hint: the merged requirement below is the intersection of every\n\
             constraint placed on '{id}' by the packages resolved so far.\n\
             Loosen one of them, or check that a matching version exists at all.",
             id = .id, requirement = .requirement)]
    UnsatisfiableConstraints { id: String, requirement: VersionSet },

    #[error("Unknown package '{0}': the provider could not locate it")]
    UnknownContainer(String),

    #[error("Failed to fetch metadata for '{id}': {cause}")]
    FetchFailed { id: String, cause: String },

    #[error("Resolution was cancelled")]
    Cancelled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("{0}")]
    Other(String),
}
