//! Working directory
//!
//! The only area that touches user files. It enumerates and reads them for staging
//! (as a [`ContentsProvider`]), compares them against the index for status, and
//! applies checkout migrations.
//!
//! ## Ignore rules
//!
//! `.vsxignore` at the root holds one glob per line (`*`, `?`, `[...]`). A path is
//! ignored when the pattern matches the whole relative path or any of its leading
//! directories. The metadata directory `.vsx` is always ignored.

use crate::areas::database::Database;
use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::status_info::{FileMap, WorkspaceChanges};
use crate::errors::{Error, Result};
use bytes::Bytes;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const METADATA_DIR: &str = ".vsx";
pub const IGNORE_FILE: &str = ".vsxignore";

/// Supplies file bytes to the staging machinery
pub trait ContentsProvider {
    fn contents(&self, path: &Path) -> Result<Bytes>;
}

/// In-memory working tree
impl ContentsProvider for BTreeMap<PathBuf, Bytes> {
    fn contents(&self, path: &Path) -> Result<Bytes> {
        self.get(path)
            .cloned()
            .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))
    }
}

/// Compiled `.vsxignore` patterns
#[derive(Debug, Default)]
pub struct IgnoreRules {
    patterns: Vec<Regex>,
}

impl IgnoreRules {
    pub fn load(root: &Path) -> Result<Self> {
        let ignore_path = root.join(IGNORE_FILE);
        if !ignore_path.is_file() {
            return Ok(IgnoreRules::default());
        }

        let contents = std::fs::read_to_string(&ignore_path).map_err(Error::io_at(&ignore_path))?;
        Self::parse(&contents, &ignore_path)
    }

    fn parse(contents: &str, origin: &Path) -> Result<Self> {
        let patterns = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|glob| {
                Regex::new(&Self::glob_to_regex(glob)).map_err(|e| Error::Config {
                    path: origin.to_path_buf(),
                    reason: format!("invalid ignore pattern '{glob}': {e}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(IgnoreRules { patterns })
    }

    fn glob_to_regex(glob: &str) -> String {
        let mut regex = String::from("^");
        let mut in_class = false;

        for c in glob.trim_end_matches('/').chars() {
            match c {
                '*' if !in_class => regex.push_str(".*"),
                '?' if !in_class => regex.push('.'),
                '[' if !in_class => {
                    in_class = true;
                    regex.push('[');
                }
                ']' if in_class => {
                    in_class = false;
                    regex.push(']');
                }
                '!' if in_class && regex.ends_with('[') => regex.push('^'),
                c if in_class => regex.push(c),
                c => regex.push_str(&regex::escape(&c.to_string())),
            }
        }
        if in_class {
            regex.push(']');
        }
        regex.push('$');

        regex
    }

    pub fn is_ignored(&self, relative: &Path) -> bool {
        let mut prefix = PathBuf::new();

        for component in relative.components() {
            prefix.push(component);
            if prefix == Path::new(METADATA_DIR) {
                return true;
            }

            let candidate = prefix.to_string_lossy().replace('\\', "/");
            if self.patterns.iter().any(|re| re.is_match(&candidate)) {
                return true;
            }
        }

        false
    }
}

#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    ignore: IgnoreRules,
}

impl Workspace {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let ignore = IgnoreRules::load(&path)?;
        Ok(Workspace { path, ignore })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_ignored(&self, relative: &Path) -> bool {
        self.ignore.is_ignored(relative)
    }

    /// Relative path of `path` inside the workspace
    pub fn relativize(&self, path: &Path) -> Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(Error::io_at(path))?
                .join(path)
        };
        let absolute = absolute.canonicalize().unwrap_or(absolute);
        let root = self.path.canonicalize().unwrap_or_else(|_| self.path.clone());

        absolute
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .map_err(|_| Error::InvalidPath(path.to_path_buf()))
    }

    /// Every non-ignored file below `root` (the whole workspace by default), sorted
    pub fn list_files(&self, root: Option<&Path>) -> Result<Vec<PathBuf>> {
        let start = match root {
            Some(relative) => self.path.join(relative),
            None => self.path.clone(),
        };

        if start.is_file() {
            let relative = start
                .strip_prefix(&self.path)
                .map(Path::to_path_buf)
                .map_err(|_| Error::InvalidPath(start.clone()))?;
            return Ok(if self.is_ignored(&relative) {
                vec![]
            } else {
                vec![relative]
            });
        }
        if !start.is_dir() {
            return Err(Error::InvalidPath(start));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&start)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry
                    .path()
                    .strip_prefix(&self.path)
                    .map(|relative| relative.as_os_str().is_empty() || !self.is_ignored(relative))
                    .unwrap_or(false)
            });

        for entry in walker {
            let entry = entry.map_err(|e| Error::Io {
                path: start.clone(),
                source: e.into(),
            })?;
            if entry.file_type().is_file()
                && let Ok(relative) = entry.path().strip_prefix(&self.path)
            {
                files.push(relative.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    pub fn read_file(&self, relative: &Path) -> Result<Bytes> {
        let path = self.path.join(relative);
        std::fs::read(&path)
            .map(Bytes::from)
            .map_err(Error::io_at(&path))
    }

    pub fn file_exists(&self, relative: &Path) -> bool {
        self.path.join(relative).is_file()
    }

    /// Working files compared with the staged blobs
    pub fn inspect(&self, staged: &FileMap) -> Result<WorkspaceChanges> {
        let mut changes = WorkspaceChanges::default();
        let files = self.list_files(None)?;

        for path in &files {
            match staged.get(path) {
                None => changes.untracked.push(path.clone()),
                Some(oid) => {
                    let blob = Blob::new(self.read_file(path)?);
                    if blob.object_id()? != *oid {
                        changes.modified.push(path.clone());
                    }
                }
            }
        }
        for path in staged.keys() {
            if !self.file_exists(path) {
                changes.deleted.push(path.clone());
            }
        }

        Ok(changes)
    }

    // The order of applying migrations is important:
    // files are deleted before their directories, directories are created before their files.
    pub fn apply_migration(&self, migration: &Migration, database: &Database) -> Result<()> {
        self.apply_migration_action_set(migration, ActionType::Delete, database)?;
        // children before parents
        for dir_path in migration.rmdirs().iter().rev() {
            self.remove_directory(dir_path)?;
        }

        // parents before children
        for dir_path in migration.mkdirs() {
            self.make_directory(dir_path)?;
        }
        self.apply_migration_action_set(migration, ActionType::Modify, database)?;
        self.apply_migration_action_set(migration, ActionType::Add, database)?;

        tracing::debug!(files = migration.len(), "applied migration to workspace");
        Ok(())
    }

    fn apply_migration_action_set(
        &self,
        migration: &Migration,
        action: ActionType,
        database: &Database,
    ) -> Result<()> {
        for (file_path, oid) in migration.actions_of(action) {
            let path = self.path.join(file_path);

            if path.is_dir() {
                std::fs::remove_dir_all(&path).map_err(Error::io_at(&path))?;
            } else if path.exists() {
                std::fs::remove_file(&path).map_err(Error::io_at(&path))?;
            }

            if let Some(oid) = oid {
                let blob = database.load_blob(oid)?;
                std::fs::write(&path, blob.content()).map_err(Error::io_at(&path))?;
            }
        }

        Ok(())
    }

    fn remove_directory(&self, dir_path: &Path) -> Result<()> {
        let dir_path = self.path.join(dir_path);

        match std::fs::remove_dir(&dir_path) {
            Ok(()) => Ok(()),
            // untracked files keep the directory alive
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::DirectoryNotEmpty
                ) =>
            {
                Ok(())
            }
            Err(e) => Err(Error::Io {
                path: dir_path,
                source: e,
            }),
        }
    }

    fn make_directory(&self, dir_path: &Path) -> Result<()> {
        let dir_path = self.path.join(dir_path);

        if dir_path.is_file() {
            std::fs::remove_file(&dir_path).map_err(Error::io_at(&dir_path))?;
        }
        if !dir_path.is_dir() {
            std::fs::create_dir(&dir_path).map_err(Error::io_at(&dir_path))?;
        }

        Ok(())
    }
}

impl ContentsProvider for Workspace {
    fn contents(&self, path: &Path) -> Result<Bytes> {
        self.read_file(path)
    }
}
