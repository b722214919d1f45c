use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Result;
use bytes::Bytes;
use std::io::BufRead;

/// Produce the canonical body of an object (without the type/size header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Rebuild an object from its canonical body
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    /// The framed bytes that get hashed and stored: `<type> <size>\0<body>`
    fn framed(&self) -> Result<Bytes> {
        Ok(frame(self.object_type(), &self.serialize()?))
    }

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::digest(&self.framed()?))
    }
}

pub fn frame(object_type: ObjectType, body: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), body.len());
    let mut framed = Vec::with_capacity(header.len() + body.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(body);
    framed.into()
}

/// An object read back from the store, body already stripped of its header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    pub object_type: ObjectType,
    pub content: Bytes,
}
