//! Index file format
//!
//! The index (staging area) records which blob each tracked path will have in the
//! next commit.
//!
//! ## File Format
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "VIDX" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - Each entry padded to 8-byte alignment
//!   - Raw object id, path length, NUL-terminated path
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod index_entry;
pub mod index_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12;

/// Magic signature identifying index files
pub const SIGNATURE: &str = "VIDX";

/// Index file format version
pub const VERSION: u32 = 1;
