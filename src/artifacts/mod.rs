//! Version control data structures and algorithms
//!
//! - `branch`: branch names and revision parsing
//! - `checkout`: checkout planning (migrations)
//! - `diff`: line diffs (Myers), hunks and tree comparison
//! - `index`: binary index format
//! - `log`: ancestry walks and history listing
//! - `merge`: merge base, three-way merge, pending merge state
//! - `objects`: blobs, trees, commits and their ids
//! - `status`: staged and working-tree change reports

pub mod branch;
pub mod checkout;
pub mod diff;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
