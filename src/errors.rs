//! Error taxonomy for the version control engine
//!
//! Every failure the core can surface is a variant of [`Error`]. Variants carry the
//! offending object id, reference name or path so callers never have to guess what
//! went wrong.
//!
//! - Corruption (`CorruptObject`, `CorruptIndex`, dangling ids) is fatal and never
//!   repaired by the engine.
//! - `ConcurrentUpdate` is transient: the caller may re-read the reference and retry.
//! - Merge conflicts are reported as data in a `MergeResult`; `MergeConflict` is only
//!   raised when a caller tries to finalize a merge that still has unresolved paths.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("object {oid} is corrupt: {reason}")]
    CorruptObject { oid: ObjectId, reason: String },

    #[error("object {oid} is a {actual}, expected a {expected}")]
    UnexpectedObjectType {
        oid: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("malformed object data: {0}")]
    MalformedObject(String),

    #[error("invalid object id '{0}'")]
    InvalidObjectId(String),

    #[error("short object id {prefix} is ambiguous: {candidates:?}")]
    AmbiguousObjectId {
        prefix: String,
        candidates: Vec<ObjectId>,
    },

    #[error("parent {0} does not name an existing commit")]
    InvalidParent(ObjectId),

    #[error("no common ancestor between {left} and {right}")]
    NoCommonAncestor { left: ObjectId, right: ObjectId },

    #[error("nothing to commit, index matches HEAD")]
    NothingToCommit,

    #[error("staged changes would be discarded: {}", display_paths(.paths))]
    DirtyWorkingState { paths: Vec<PathBuf> },

    #[error(
        "reference {name} moved concurrently (expected {}, found {})",
        display_oid(.expected.as_ref()),
        display_oid(.actual.as_ref())
    )]
    ConcurrentUpdate {
        name: String,
        expected: Option<ObjectId>,
        actual: Option<ObjectId>,
    },

    #[error("unknown reference '{0}'")]
    UnknownReference(String),

    #[error("unresolved merge conflicts in: {}", display_paths(.paths))]
    MergeConflict { paths: Vec<PathBuf> },

    #[error("invalid branch name '{0}'")]
    InvalidBranchName(String),

    #[error("branch {0} already exists")]
    BranchExists(String),

    #[error("tag {0} already exists")]
    TagExists(String),

    #[error("cannot delete branch {0} while it is checked out")]
    CurrentBranch(String),

    #[error("not a vsx repository (missing {})", .0.display())]
    NotARepository(PathBuf),

    #[error("repository already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("index file {} is corrupt: {reason}", .path.display())]
    CorruptIndex { path: PathBuf, reason: String },

    #[error("invalid configuration in {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("author identity unknown, set {0} or [user] in config.toml")]
    MissingAuthor(&'static str),

    #[error("invalid path '{}'", .0.display())]
    InvalidPath(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a closure mapping an `io::Error` onto the path it happened at.
    pub fn io_at(path: impl AsRef<Path>) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.as_ref().to_path_buf();
        move |source| Error::Io { path, source }
    }

    /// Whether retrying the same operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::ConcurrentUpdate { .. })
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_oid(oid: Option<&ObjectId>) -> String {
    oid.map(|oid| oid.to_string())
        .unwrap_or_else(|| "nothing".to_string())
}
