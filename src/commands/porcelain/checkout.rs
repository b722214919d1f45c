use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::CheckoutReport;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::merge_state::MergeState;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};

impl Repository {
    /// Move HEAD to `target` and restage its tree
    ///
    /// A branch name attaches HEAD; any other revision detaches it. A pending
    /// merge, or staged changes that differ from HEAD's tree, make this fail
    /// unless `force` is set, in which case both are discarded. The returned
    /// migration is what the working directory needs to match the new index.
    pub fn checkout(&self, target: &str, force: bool) -> Result<CheckoutReport> {
        let (head, target_oid) = match self.local_branch(target)? {
            Some((branch, oid)) => (Head::Attached(branch), oid),
            None => {
                let oid = self.resolve_revision(target)?;
                (Head::Detached(oid.clone()), oid)
            }
        };

        if !force && let Some(state) = self.pending_merge()? {
            return Err(Error::MergeConflict {
                paths: state.conflicts.into_iter().map(|c| c.path).collect(),
            });
        }

        let mut index = self.reload_index()?;
        if !force {
            let status = index.status(self.database(), self.head_tree()?.as_ref())?;
            if !status.is_clean() {
                return Err(Error::DirtyWorkingState {
                    paths: status.changes().into_keys().collect(),
                });
            }
        }

        let target_tree = self.database().load_commit(&target_oid)?.tree_oid().clone();
        let before = index.file_map();
        index.load_from_tree(self.database(), &target_tree)?;
        let migration = Migration::plan(&before, &index.file_map());
        index.write_updates()?;
        drop(index);

        match &head {
            Head::Attached(branch) => self.refs().set_head_attached(branch)?,
            Head::Detached(oid) => self.refs().set_head_detached(oid)?,
        }
        if force {
            MergeState::clear(&self.merge_state_path())?;
        }

        tracing::info!(target, commit = %target_oid, files = migration.len(), "checked out");
        Ok(CheckoutReport { head, migration })
    }

    /// An existing local branch called `name`, with its commit
    fn local_branch(&self, name: &str) -> Result<Option<(BranchName, ObjectId)>> {
        let Ok(branch) = BranchName::try_parse(name) else {
            return Ok(None);
        };

        Ok(self
            .refs()
            .get_ref(&branch.to_ref_name())?
            .map(|oid| (branch, oid)))
    }
}
