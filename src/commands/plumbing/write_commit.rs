use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};

impl Repository {
    /// Store a commit for an existing tree without moving any reference
    ///
    /// The author comes from the environment or the repository config.
    pub fn write_commit(&self, tree: &str, parents: &[&str], message: &str) -> Result<ObjectId> {
        let tree = self.resolve_object(tree)?;
        let parents = parents
            .iter()
            .map(|parent| {
                self.resolve_object(parent).map_err(|e| match e {
                    Error::UnknownReference(_) | Error::ObjectNotFound(_) => {
                        Error::UnknownReference(parent.to_string())
                    }
                    e => e,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.create_commit(&tree, parents, self.config().author()?, message)
    }
}
