use crate::artifacts::branch::INVALID_BRANCH_NAME_REGEX;
use crate::errors::{Error, Result};

pub const HEADS_PREFIX: &str = "refs/heads/";
pub const TAGS_PREFIX: &str = "refs/tags/";

/// A validated short reference name, usable for both branches and tags
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidBranchName(name));
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .map_err(|_| Error::InvalidBranchName(name.clone()))?;

        if re.is_match(&name) {
            Err(Error::InvalidBranchName(name))
        } else {
            Ok(Self(name))
        }
    }

    /// Strip `refs/heads/` from a full reference name
    pub fn from_ref_name(ref_name: &str) -> Result<Self> {
        match ref_name.strip_prefix(HEADS_PREFIX) {
            Some(name) => Self::try_parse(name),
            None => Err(Error::InvalidBranchName(ref_name.to_string())),
        }
    }

    /// `refs/heads/<name>`
    pub fn to_ref_name(&self) -> String {
        format!("{HEADS_PREFIX}{}", self.0)
    }

    /// `refs/tags/<name>`
    pub fn to_tag_ref_name(&self) -> String {
        format!("{TAGS_PREFIX}{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
