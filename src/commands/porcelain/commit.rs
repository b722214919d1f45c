use crate::areas::repository::Repository;
use crate::artifacts::merge::merge_state::MergeState;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};

impl Repository {
    /// Commit the staged snapshot onto whatever HEAD points at
    ///
    /// With a merge pending, the merged commit becomes the second parent and the
    /// pending state is cleared. Conflicted paths not yet staged or unstaged
    /// since the merge stopped block it.
    pub fn commit(&self, message: &str, author: Author) -> Result<ObjectId> {
        let pending = self.pending_merge()?;
        if let Some(state) = &pending {
            let paths = state.unresolved();
            if !paths.is_empty() {
                return Err(Error::MergeConflict { paths });
            }
        }

        let (tree, index_is_empty) = {
            let index = self.reload_index()?;
            (index.snapshot_as_tree(self.database())?, index.is_empty())
        };

        let head = self.refs().read_head()?;
        let mut parents = head.iter().cloned().collect::<Vec<_>>();
        match (&pending, &head) {
            (Some(state), _) => parents.push(state.source_oid.clone()),
            (None, Some(head)) => {
                if self.database().load_commit(head)?.tree_oid() == &tree {
                    return Err(Error::NothingToCommit);
                }
            }
            (None, None) if index_is_empty => return Err(Error::NothingToCommit),
            (None, None) => {}
        }

        let oid = self.create_commit(&tree, parents, author, message)?;
        self.refs().update_head(&oid, head.as_ref())?;
        if pending.is_some() {
            MergeState::clear(&self.merge_state_path())?;
        }

        tracing::info!(commit = %oid, "committed");
        Ok(oid)
    }

    /// Store a commit object without moving any reference
    pub fn create_commit(
        &self,
        tree: &ObjectId,
        parents: Vec<ObjectId>,
        author: Author,
        message: &str,
    ) -> Result<ObjectId> {
        let tree_type = self.database().object_type(tree)?;
        if tree_type != ObjectType::Tree {
            return Err(Error::UnexpectedObjectType {
                oid: tree.clone(),
                expected: ObjectType::Tree,
                actual: tree_type,
            });
        }

        for parent in &parents {
            match self.database().object_type(parent) {
                Ok(ObjectType::Commit) => {}
                Ok(_) | Err(Error::ObjectNotFound(_)) => {
                    return Err(Error::InvalidParent(parent.clone()));
                }
                Err(e) => return Err(e),
            }
        }

        let commit = Commit::new(parents, tree.clone(), author, message.to_string());
        let oid = self.database().store(&commit)?;
        tracing::debug!(commit = %oid, %tree, "stored commit");

        Ok(oid)
    }
}
