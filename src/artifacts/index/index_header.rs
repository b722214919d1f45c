use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexHeader {
    pub marker: String,
    pub version: u32,
    pub entries_count: u32,
}

impl IndexHeader {
    pub fn new(entries_count: u32) -> Self {
        IndexHeader {
            marker: String::from(SIGNATURE),
            version: VERSION,
            entries_count,
        }
    }

    pub fn serialize(&self) -> Bytes {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.extend_from_slice(self.marker.as_bytes());
        // writes into a Vec cannot fail
        let _ = bytes.write_u32::<byteorder::NetworkEndian>(self.version);
        let _ = bytes.write_u32::<byteorder::NetworkEndian>(self.entries_count);

        Bytes::from(bytes)
    }

    /// Parse a header, `None` when fewer than 12 bytes are given
    pub fn deserialize(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < HEADER_SIZE {
            return None;
        }

        Some(IndexHeader {
            marker: String::from_utf8_lossy(&bytes[0..4]).into_owned(),
            version: byteorder::NetworkEndian::read_u32(&bytes[4..8]),
            entries_count: byteorder::NetworkEndian::read_u32(&bytes[8..12]),
        })
    }
}
