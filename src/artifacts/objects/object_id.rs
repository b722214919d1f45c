//! Object identifier (SHA-1 digest)
//!
//! Ids are 40-character lowercase hexadecimal strings. They name every stored object
//! (blobs, trees, commits) and double as the object's storage location.
//!
//! ## Storage
//!
//! Objects live at `.vsx/objects/<first-2-chars>/<remaining-38-chars>`.

use crate::artifacts::objects::{OBJECT_ID_LENGTH, RAW_OBJECT_ID_LENGTH};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

/// Content digest identifying a stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate a full hexadecimal id
    pub fn try_parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.len() != OBJECT_ID_LENGTH || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidObjectId(id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Digest arbitrary bytes into an id
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Whether `candidate` could be an abbreviation of some id
    pub fn is_hex_prefix(candidate: &str) -> bool {
        !candidate.is_empty()
            && candidate.len() <= OBJECT_ID_LENGTH
            && candidate.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Write the id as 20 raw bytes (tree entries use the binary form)
    pub fn write_raw_to<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let mut raw = [0u8; RAW_OBJECT_ID_LENGTH];
        for (i, byte) in raw.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&self.0[2 * i..2 * i + 2], 16)
                .map_err(|_| Error::InvalidObjectId(self.0.clone()))?;
        }
        writer
            .write_all(&raw)
            .map_err(|e| Error::MalformedObject(format!("unable to write object id: {e}")))
    }

    /// Read 20 raw bytes back into an id
    pub fn read_raw_from<R: io::Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut raw = [0u8; RAW_OBJECT_ID_LENGTH];
        reader
            .read_exact(&mut raw)
            .map_err(|_| Error::MalformedObject("truncated object id".to_string()))?;

        Ok(Self(raw.iter().map(|byte| format!("{byte:02x}")).collect()))
    }

    /// Relative storage path, `ab/cdef...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters, the usual abbreviation
    pub fn to_short_oid(&self) -> String {
        self.0[..7].to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ObjectId {
    type Error = Error;

    fn try_from(id: String) -> Result<Self> {
        Self::try_parse(id)
    }
}

impl From<ObjectId> for String {
    fn from(oid: ObjectId) -> Self {
        oid.0
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
