use crate::areas::repository::Repository;
use crate::areas::workspace::METADATA_DIR;
use crate::config::{CONFIG_FILE_NAME, RepoConfig};
use crate::errors::{Error, Result};
use std::fs;
use std::path::PathBuf;

impl Repository {
    /// Create an empty repository with the default configuration
    pub fn init(path: impl Into<PathBuf>) -> Result<Repository> {
        Self::init_with_config(path, RepoConfig::default())
    }

    /// Create an empty repository: HEAD attached to the configured default branch,
    /// no commits, an empty index
    pub fn init_with_config(path: impl Into<PathBuf>, config: RepoConfig) -> Result<Repository> {
        let path = path.into();
        let metadata_path = path.join(METADATA_DIR);
        if metadata_path.exists() {
            return Err(Error::AlreadyInitialized(metadata_path));
        }
        let default_branch = config.default_branch()?;

        let repository = Repository::from_parts(path, metadata_path.clone(), config);

        for dir in [
            repository.database().objects_path().to_path_buf(),
            repository.refs().heads_path(),
            repository.refs().tags_path(),
        ] {
            fs::create_dir_all(&dir).map_err(Error::io_at(&dir))?;
        }

        repository
            .config()
            .save(&metadata_path.join(CONFIG_FILE_NAME))?;
        repository.refs().set_head_attached(&default_branch)?;
        repository.index().write_updates()?;

        tracing::info!(
            path = %repository.path().display(),
            branch = %default_branch,
            "initialized repository"
        );

        Ok(repository)
    }
}
