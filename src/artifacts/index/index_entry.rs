//! Index entry representation
//!
//! Each entry maps one working path to the blob staged for it.
//!
//! ## Entry Format
//!
//! ```text
//! 20 bytes  raw object id
//!  2 bytes  path length (capped at 0xfff)
//!  n bytes  path, NUL-terminated and NUL-padded to a multiple of 8
//! ```

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::path::{Path, PathBuf};

/// Maximum path length recorded in the flags field
const MAX_PATH_SIZE: usize = 0xfff;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Minimum size of an index entry in bytes
pub const ENTRY_MIN_SIZE: usize = 24;

/// Offset of the path inside a serialized entry
const PATH_OFFSET: usize = 22;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// File path relative to the repository root
    pub name: PathBuf,
    /// Staged blob
    pub oid: ObjectId,
}

impl IndexEntry {
    /// Every proper ancestor directory, outermost first
    pub fn parent_dirs(&self) -> Vec<&Path> {
        let mut dirs = self
            .name
            .ancestors()
            .skip(1)
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect::<Vec<_>>();
        dirs.reverse();
        dirs
    }

    pub fn serialize(&self) -> Result<Bytes> {
        let entry_name = self
            .name
            .to_str()
            .ok_or_else(|| Error::InvalidPath(self.name.clone()))?;

        let mut entry_bytes = Vec::with_capacity(ENTRY_MIN_SIZE + entry_name.len());
        self.oid.write_raw_to(&mut entry_bytes)?;
        // writes into a Vec cannot fail
        let _ = entry_bytes
            .write_u16::<byteorder::NetworkEndian>(entry_name.len().min(MAX_PATH_SIZE) as u16);
        entry_bytes.extend_from_slice(entry_name.as_bytes());

        // at least one NUL terminates the path
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }

    /// Parse one padded entry, `Err(reason)` on malformed bytes
    pub fn deserialize(bytes: &[u8]) -> std::result::Result<Self, String> {
        if bytes.len() < ENTRY_MIN_SIZE {
            return Err("index entry too short".to_string());
        }

        let oid = ObjectId::read_raw_from(&mut &bytes[..PATH_OFFSET - 2])
            .map_err(|e| e.to_string())?;
        let declared_len = byteorder::NetworkEndian::read_u16(&bytes[PATH_OFFSET - 2..PATH_OFFSET]);

        let name_end = bytes[PATH_OFFSET..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| "missing NUL terminator in entry path".to_string())?;
        let name_bytes = &bytes[PATH_OFFSET..PATH_OFFSET + name_end];
        if (declared_len as usize) < MAX_PATH_SIZE && declared_len as usize != name_bytes.len() {
            return Err(format!(
                "entry path length {} does not match declared {declared_len}",
                name_bytes.len()
            ));
        }
        let name = std::str::from_utf8(name_bytes)
            .map_err(|_| "entry path is not utf-8".to_string())?;

        Ok(IndexEntry::new(PathBuf::from(name), oid))
    }
}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}
