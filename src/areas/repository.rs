use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::METADATA_DIR;
use crate::artifacts::branch::revision::{MIN_ABBREVIATED_OID_LENGTH, Revision};
use crate::artifacts::merge::merge_state::{MERGE_STATE_FILE_NAME, MergeState};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::config::{CONFIG_FILE_NAME, RepoConfig};
use crate::errors::{Error, Result};
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

pub const OBJECTS_DIR: &str = "objects";
pub const INDEX_FILE_NAME: &str = "index";

/// Handle on one repository: its metadata directory and the areas inside it
///
/// The handle never reads the working directory; callers hand file contents in
/// through a [`ContentsProvider`](crate::areas::workspace::ContentsProvider).
#[derive(Debug)]
pub struct Repository {
    path: PathBuf,
    metadata_path: PathBuf,
    database: Database,
    refs: Refs,
    index: RefCell<Index>,
    config: RepoConfig,
}

impl Repository {
    /// Open the repository whose working directory is `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata_path = path.join(METADATA_DIR);
        if !metadata_path.is_dir() {
            return Err(Error::NotARepository(metadata_path));
        }

        let config = RepoConfig::load(&metadata_path.join(CONFIG_FILE_NAME))?;
        let mut index = Index::new(metadata_path.join(INDEX_FILE_NAME));
        index.rehydrate()?;

        tracing::debug!(path = %path.display(), "opened repository");

        Ok(Repository {
            database: Database::new(metadata_path.join(OBJECTS_DIR)),
            refs: Refs::new(&metadata_path),
            index: RefCell::new(index),
            config,
            path,
            metadata_path,
        })
    }

    /// Open the closest repository at or above `start`
    pub fn discover(start: &Path) -> Result<Self> {
        let start = start.canonicalize().map_err(Error::io_at(start))?;

        match start
            .ancestors()
            .find(|candidate| candidate.join(METADATA_DIR).is_dir())
        {
            Some(root) => Self::open(root),
            None => Err(Error::NotARepository(start.join(METADATA_DIR))),
        }
    }

    /// Working directory root
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `.vsx` directory
    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// Exclusive access to the in-memory index
    pub fn index(&self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn merge_state_path(&self) -> PathBuf {
        self.metadata_path.join(MERGE_STATE_FILE_NAME)
    }

    /// The merge waiting for its commit, if any
    pub fn pending_merge(&self) -> Result<Option<MergeState>> {
        MergeState::load(&self.merge_state_path())
    }

    /// Tree of the commit HEAD resolves to, `None` on an unborn branch
    pub fn head_tree(&self) -> Result<Option<ObjectId>> {
        match self.refs.read_head()? {
            Some(oid) => Ok(Some(self.database.load_commit(&oid)?.tree_oid().clone())),
            None => Ok(None),
        }
    }

    /// Resolve a revision expression to a commit id
    pub fn resolve_revision(&self, revision: &str) -> Result<ObjectId> {
        Revision::try_parse(revision)?.resolve(&self.refs, &self.database)
    }

    /// Resolve a revision, or a full or abbreviated id of any object type
    pub fn resolve_object(&self, name: &str) -> Result<ObjectId> {
        let looks_like_oid =
            name.len() >= MIN_ABBREVIATED_OID_LENGTH && ObjectId::is_hex_prefix(name);
        if !looks_like_oid {
            return self.resolve_revision(name);
        }

        // references and commits first, then any stored object
        match self.resolve_revision(name) {
            Err(Error::UnknownReference(_) | Error::UnexpectedObjectType { .. }) => {}
            resolved => return resolved,
        }

        if name.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(name)?;
            return if self.database.contains(&oid) {
                Ok(oid)
            } else {
                Err(Error::ObjectNotFound(oid))
            };
        }

        let mut candidates = self.database.find_objects_by_prefix(name)?;
        match candidates.len() {
            0 => Err(Error::UnknownReference(name.to_string())),
            1 => Ok(candidates.remove(0)),
            _ => Err(Error::AmbiguousObjectId {
                prefix: name.to_string(),
                candidates,
            }),
        }
    }

    /// Re-read the index from disk, dropping unsaved in-memory changes
    pub(crate) fn reload_index(&self) -> Result<RefMut<'_, Index>> {
        let mut index = self.index();
        index.rehydrate()?;
        Ok(index)
    }

    pub(crate) fn from_parts(path: PathBuf, metadata_path: PathBuf, config: RepoConfig) -> Self {
        Repository {
            database: Database::new(metadata_path.join(OBJECTS_DIR)),
            refs: Refs::new(&metadata_path),
            index: RefCell::new(Index::new(metadata_path.join(INDEX_FILE_NAME))),
            config,
            path,
            metadata_path,
        }
    }
}
