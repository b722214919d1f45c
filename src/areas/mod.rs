//! Repository areas
//!
//! - `database`: content-addressed object store
//! - `index`: staging area
//! - `refs`: branches, tags and HEAD
//! - `repository`: the handle tying the areas of one `.vsx` directory together
//! - `workspace`: the working directory, which only the outer layer reads and writes

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
