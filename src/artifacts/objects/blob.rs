//! Blob object
//!
//! Blobs hold the raw bytes of one file version and nothing else; names live in
//! the tree that points at them.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

/// How far into a blob we look for a NUL byte before calling it text
const BINARY_SNIFF_LEN: usize = 8000;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(Bytes::from(text.into()))
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Content as text, or `None` for binary data
    ///
    /// Content counts as binary when it is not valid UTF-8 or when its first
    /// 8000 bytes contain a NUL.
    pub fn as_text(&self) -> Option<&str> {
        let sniff = &self.content[..self.content.len().min(BINARY_SNIFF_LEN)];
        if sniff.contains(&0) {
            return None;
        }
        std::str::from_utf8(&self.content).ok()
    }

    pub fn is_binary(&self) -> bool {
        self.as_text().is_none()
    }
}

impl Packable for Blob {
    fn serialize(&self) -> Result<Bytes> {
        Ok(self.content.clone())
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .map_err(|e| Error::MalformedObject(format!("unreadable blob: {e}")))?;

        Ok(Self::new(content.into()))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}
