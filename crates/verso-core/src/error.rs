//! Error types for verso operations.

use std::io;

use thiserror::Error;

/// All possible verso errors.
#[derive(Debug, Error)]
pub enum VersoError {
    /// The working directory has no `.verso/` control directory.
    #[error("not a verso repository (missing .verso/)")]
    RepoNotFound,
    /// A verso repository already exists here.
    #[error(".verso/ already exists")]
    RepoAlreadyInit,
    /// A group with this name has already been initialized.
    #[error("group already tracked: {0}")]
    GroupAlreadyTracked(String),
    /// No group with this name exists.
    #[error("group not found: {0}")]
    GroupNotFound(String),
    /// The file has no tracking record (or no entry in the requested version).
    #[error("file not tracked: {0}")]
    FileNotTracked(String),
    /// Exactly one of the two version ids of a diff was given.
    #[error("argument number mismatch")]
    ArgumentMismatch,
    /// An object with the given reference was not found.
    #[error("object not found: {0}")]
    ObjectNotFound(String),
    /// A version with this id does not exist.
    #[error("version not found: {0}")]
    VersionNotFound(String),
    /// A structured file could not be parsed or serialized.
    #[error("parse failure: {0}")]
    ParseFailure(#[from] serde_json::Error),
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// A compressed payload failed to decode, or its digest did not match.
    #[error("corrupt object: {0}")]
    CorruptObject(String),
    /// `config.toml` is malformed.
    #[error("invalid config: {0}")]
    Config(String),
    /// Group history was written but the tracker registry was not.
    #[error("version {version_id} was recorded but the tracker registry could not be saved: {source}")]
    RegistryOutOfSync {
        version_id: String,
        #[source]
        source: Box<VersoError>,
    },
}

/// Fieldless error kind, for callers that only care which sentinel they got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RepoNotFound,
    RepoAlreadyInit,
    GroupAlreadyTracked,
    GroupNotFound,
    FileNotTracked,
    ArgumentMismatch,
    ObjectNotFound,
    VersionNotFound,
    ParseFailure,
    IoFailure,
    CorruptObject,
    Config,
    RegistryOutOfSync,
}

impl VersoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VersoError::RepoNotFound => ErrorKind::RepoNotFound,
            VersoError::RepoAlreadyInit => ErrorKind::RepoAlreadyInit,
            VersoError::GroupAlreadyTracked(_) => ErrorKind::GroupAlreadyTracked,
            VersoError::GroupNotFound(_) => ErrorKind::GroupNotFound,
            VersoError::FileNotTracked(_) => ErrorKind::FileNotTracked,
            VersoError::ArgumentMismatch => ErrorKind::ArgumentMismatch,
            VersoError::ObjectNotFound(_) => ErrorKind::ObjectNotFound,
            VersoError::VersionNotFound(_) => ErrorKind::VersionNotFound,
            VersoError::ParseFailure(_) => ErrorKind::ParseFailure,
            VersoError::Io(_) => ErrorKind::IoFailure,
            VersoError::CorruptObject(_) => ErrorKind::CorruptObject,
            VersoError::Config(_) => ErrorKind::Config,
            VersoError::RegistryOutOfSync { .. } => ErrorKind::RegistryOutOfSync,
        }
    }
}

/// Convenience alias for Results in verso.
pub type VersoResult<T> = Result<T, VersoError>;
