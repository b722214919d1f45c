//! Commit history traversal
//!
//! - `ancestors`: lazy breadth-first walk over every ancestor of a commit
//! - `rev_list`: reverse-chronological topological listing for `log`
//!
//! Both walks are iterators; stopping early stops the walk.

pub mod ancestors;
pub mod rev_list;
