//! Repository operations
//!
//! Every command is an `impl Repository` block returning structured results; no
//! command prints or touches the working directory. Two groups:
//!
//! - `plumbing`: direct object access (hash-object, cat-file, ls-tree, write-commit)
//! - `porcelain`: day-to-day version control (init, add, commit, branch, checkout,
//!   diff, log, merge, clone, status)

pub mod plumbing;
pub mod porcelain;
