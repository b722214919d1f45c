use crate::areas::repository::Repository;
use crate::artifacts::diff::tree_diff::{DiffReport, diff_trees};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::status_info::FileMap;
use crate::errors::Result;

impl Repository {
    /// Compare the trees of two revisions
    pub fn diff(&self, rev_a: &str, rev_b: &str) -> Result<DiffReport> {
        let left = self.revision_tree(rev_a)?;
        let right = self.revision_tree(rev_b)?;

        diff_trees(self.database(), &left, &right)
    }

    /// Compare a revision (HEAD by default) with the staged snapshot
    ///
    /// On an unborn branch HEAD counts as an empty tree.
    pub fn diff_staged(&self, rev: Option<&str>) -> Result<DiffReport> {
        let base = match rev {
            Some(rev) => self.database().flatten_tree(&self.revision_tree(rev)?)?,
            None => match self.head_tree()? {
                Some(tree) => self.database().flatten_tree(&tree)?,
                None => FileMap::new(),
            },
        };
        let staged = self.reload_index()?.file_map();

        DiffReport::compare(self.database(), &base, &staged)
    }

    fn revision_tree(&self, rev: &str) -> Result<ObjectId> {
        let oid = self.resolve_revision(rev)?;
        Ok(self.database().load_commit(&oid)?.tree_oid().clone())
    }
}
