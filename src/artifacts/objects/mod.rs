//! Stored object types
//!
//! Everything the repository remembers is an immutable object named by the SHA-1
//! digest of its framed bytes. There are three types:
//!
//! - **Blob**: file content (raw bytes)
//! - **Tree**: directory listing (names, modes and object ids)
//! - **Commit**: snapshot with metadata (tree, parents, author, message)
//!
//! All objects share the framing `<type> <size>\0<content>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in raw bytes, as stored in tree entries
pub const RAW_OBJECT_ID_LENGTH: usize = 20;
