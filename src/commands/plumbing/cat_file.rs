use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::Result;
use bytes::Bytes;

/// A stored object as `cat-file` shows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub oid: ObjectId,
    pub object_type: ObjectType,
    pub content: Bytes,
}

impl ObjectInfo {
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Human-readable body: blobs verbatim, trees one entry per line, commits
    /// in their header form
    pub fn pretty(&self) -> Result<String> {
        match self.object_type {
            ObjectType::Blob => Ok(String::from_utf8_lossy(&self.content).into_owned()),
            ObjectType::Tree => Ok(Tree::deserialize(self.content.as_ref())?.display()),
            ObjectType::Commit => Ok(Commit::deserialize(self.content.as_ref())?.display()),
        }
    }
}

impl Repository {
    /// Look up any object by revision, full id or unambiguous prefix
    pub fn cat_file(&self, name: &str) -> Result<ObjectInfo> {
        let oid = self.resolve_object(name)?;
        let raw = self.database().get(&oid)?;

        Ok(ObjectInfo {
            oid,
            object_type: raw.object_type,
            content: raw.content,
        })
    }
}
