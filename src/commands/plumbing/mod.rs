//! Plumbing commands
//!
//! Low-level access to the object store, mostly useful for scripting and for
//! inspecting what the porcelain commands wrote.
//!
//! - `hash_object`: compute a blob id and optionally store the blob
//! - `cat_file`: show any stored object
//! - `ls_tree`: list the entries of a tree
//! - `write_commit`: store a commit for an existing tree

pub mod cat_file;
pub mod hash_object;
pub mod ls_tree;
pub mod write_commit;
