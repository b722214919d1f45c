use crate::areas::refs::Head;
use crate::areas::repository::Repository;
use crate::errors::Result;
use std::path::PathBuf;

impl Repository {
    /// Copy this repository into a fresh one at `dest`
    ///
    /// The new object store holds everything reachable from any reference or
    /// HEAD; references and HEAD are reproduced exactly and the index is loaded
    /// from HEAD's tree. Populating the new working directory is up to the caller.
    pub fn clone_to(&self, dest: impl Into<PathBuf>) -> Result<Repository> {
        let clone = Repository::init_with_config(dest, self.config().clone())?;

        let refs = self.refs().list_refs()?;
        let head = self.refs().read_head()?;
        let roots = refs.iter().map(|(_, oid)| oid).chain(head.as_ref());

        let objects = self.database().reachable_objects(roots)?;
        for oid in &objects {
            clone.database().copy_object_from(self.database(), oid)?;
        }
        tracing::debug!(objects = objects.len(), "copied objects");

        for (name, oid) in &refs {
            clone.refs().set_ref(name, oid)?;
        }
        match self.refs().head()? {
            Head::Attached(branch) => clone.refs().set_head_attached(&branch)?,
            Head::Detached(oid) => clone.refs().set_head_detached(&oid)?,
        }

        if let Some(tree) = clone.head_tree()? {
            let mut index = clone.index();
            index.load_from_tree(clone.database(), &tree)?;
            index.write_updates()?;
        }

        tracing::info!(
            source = %self.path().display(),
            dest = %clone.path().display(),
            refs = refs.len(),
            "cloned repository"
        );
        Ok(clone)
    }
}
