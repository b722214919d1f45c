//! Repository configuration
//!
//! Located at `.vsx/config.toml`. Every key is optional; missing keys fall back to
//! their defaults.
//!
//! ```toml
//! [core]
//! default_branch = "main"
//!
//! [user]
//! name = "Ada Lovelace"
//! email = "ada@example.com"
//! ```
//!
//! # Author identity
//!
//! Resolved in order of precedence:
//! 1. `$VSX_AUTHOR_NAME`, `$VSX_AUTHOR_EMAIL` (and `$VSX_AUTHOR_DATE` for the timestamp)
//! 2. `[user]` in the repository config

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Author;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const AUTHOR_NAME_VAR: &str = "VSX_AUTHOR_NAME";
pub const AUTHOR_EMAIL_VAR: &str = "VSX_AUTHOR_EMAIL";
pub const AUTHOR_DATE_VAR: &str = "VSX_AUTHOR_DATE";

const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    pub core: CoreConfig,
    pub user: UserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// Branch HEAD is attached to in a fresh repository
    pub default_branch: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            default_branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl RepoConfig {
    /// Read the config, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(RepoConfig::default());
        }

        let contents = std::fs::read_to_string(path).map_err(Error::io_at(path))?;
        let config: RepoConfig = toml::from_str(&contents).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        config.validate(path)?;

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // write to a temp file in the same directory, then rename
        let temp_path = path.with_extension("toml.tmp");
        std::fs::write(&temp_path, contents).map_err(Error::io_at(&temp_path))?;
        std::fs::rename(&temp_path, path).map_err(Error::io_at(path))
    }

    fn validate(&self, path: &Path) -> Result<()> {
        BranchName::try_parse(self.core.default_branch.as_str()).map_err(|_| Error::Config {
            path: path.to_path_buf(),
            reason: format!(
                "core.default_branch '{}' is not a valid branch name",
                self.core.default_branch
            ),
        })?;

        Ok(())
    }

    pub fn default_branch(&self) -> Result<BranchName> {
        BranchName::try_parse(self.core.default_branch.as_str())
    }

    /// Author identity from the environment, then from `[user]`
    pub fn author(&self) -> Result<Author> {
        let name = std::env::var(AUTHOR_NAME_VAR)
            .ok()
            .or_else(|| self.user.name.clone())
            .ok_or(Error::MissingAuthor(AUTHOR_NAME_VAR))?;
        let email = std::env::var(AUTHOR_EMAIL_VAR)
            .ok()
            .or_else(|| self.user.email.clone())
            .ok_or(Error::MissingAuthor(AUTHOR_EMAIL_VAR))?;

        match std::env::var(AUTHOR_DATE_VAR).ok() {
            Some(date) => {
                let timestamp = Author::parse_date(&date).ok_or_else(|| Error::Config {
                    path: AUTHOR_DATE_VAR.into(),
                    reason: format!("unparseable date '{date}'"),
                })?;
                Ok(Author::new_with_timestamp(name, email, timestamp))
            }
            None => Ok(Author::new(name, email)),
        }
    }
}
