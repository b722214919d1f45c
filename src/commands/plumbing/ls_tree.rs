use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{EntryKind, TreeEntry};
use crate::errors::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// One line of `ls-tree` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeListing {
    pub path: PathBuf,
    pub entry: TreeEntry,
}

impl fmt::Display for TreeListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0>6} {} {}\t{}",
            self.entry.kind.mode(),
            self.entry.kind.object_type(),
            self.entry.oid,
            self.path.display()
        )
    }
}

impl Repository {
    /// Entries of a tree, or of a commit's tree
    ///
    /// With `recursive`, subdirectories are expanded and only files are listed.
    pub fn ls_tree(&self, name: &str, recursive: bool) -> Result<Vec<TreeListing>> {
        let oid = self.resolve_object(name)?;
        let tree = match self.database().object_type(&oid)? {
            ObjectType::Commit => self.database().load_commit(&oid)?.tree_oid().clone(),
            ObjectType::Tree => oid,
            actual => {
                return Err(Error::UnexpectedObjectType {
                    oid,
                    expected: ObjectType::Tree,
                    actual,
                });
            }
        };

        let mut listing = Vec::new();
        self.list_tree_into(&tree, Path::new(""), recursive, &mut listing)?;
        Ok(listing)
    }

    fn list_tree_into(
        &self,
        tree: &ObjectId,
        prefix: &Path,
        recursive: bool,
        listing: &mut Vec<TreeListing>,
    ) -> Result<()> {
        for (name, entry) in self.database().load_tree(tree)?.into_entries() {
            let path = prefix.join(name);
            match entry.kind {
                EntryKind::Directory if recursive => {
                    self.list_tree_into(&entry.oid, &path, recursive, listing)?
                }
                _ => listing.push(TreeListing { path, entry }),
            }
        }

        Ok(())
    }
}
