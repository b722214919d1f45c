use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use bytes::Bytes;

/// Id `content` would get as a blob, without storing it
pub fn blob_id(content: Bytes) -> Result<ObjectId> {
    Blob::new(content).object_id()
}

impl Repository {
    /// Store `content` as a blob
    pub fn hash_object(&self, content: Bytes) -> Result<ObjectId> {
        self.database().store(&Blob::new(content))
    }
}
