use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};

impl Repository {
    /// Create `refs/heads/<name>` at `start` (HEAD when omitted)
    pub fn create_branch(&self, name: &str, start: Option<&str>) -> Result<ObjectId> {
        let branch = BranchName::try_parse(name)?;
        let ref_name = branch.to_ref_name();
        if self.refs().get_ref(&ref_name)?.is_some() {
            return Err(Error::BranchExists(branch.to_string()));
        }

        let oid = self.resolve_revision(start.unwrap_or(HEAD_REF_NAME))?;
        self.refs().compare_and_swap(&ref_name, None, &oid)?;

        tracing::info!(branch = %branch, commit = %oid, "created branch");
        Ok(oid)
    }

    /// Remove a branch that HEAD is not attached to; returns its last commit
    pub fn delete_branch(&self, name: &str) -> Result<ObjectId> {
        let branch = BranchName::try_parse(name)?;
        if self.refs().head()?.branch() == Some(&branch) {
            return Err(Error::CurrentBranch(branch.to_string()));
        }

        let oid = self
            .refs()
            .delete_ref(&branch.to_ref_name())
            .map_err(|e| match e {
                Error::UnknownReference(_) => Error::UnknownReference(branch.to_string()),
                e => e,
            })?;

        tracing::info!(branch = %branch, commit = %oid, "deleted branch");
        Ok(oid)
    }

    pub fn list_branches(&self) -> Result<Vec<(BranchName, ObjectId)>> {
        self.refs().list_branches()
    }

    /// Create `refs/tags/<name>` at `start` (HEAD when omitted)
    pub fn create_tag(&self, name: &str, start: Option<&str>) -> Result<ObjectId> {
        let tag = BranchName::try_parse(name)?;
        let ref_name = tag.to_tag_ref_name();
        if self.refs().get_ref(&ref_name)?.is_some() {
            return Err(Error::TagExists(tag.to_string()));
        }

        let oid = self.resolve_revision(start.unwrap_or(HEAD_REF_NAME))?;
        self.refs().compare_and_swap(&ref_name, None, &oid)?;

        tracing::info!(tag = %tag, commit = %oid, "created tag");
        Ok(oid)
    }

    pub fn list_tags(&self) -> Result<Vec<(BranchName, ObjectId)>> {
        self.refs().list_tags()
    }
}
