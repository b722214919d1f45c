//! Porcelain commands
//!
//! - `init`: create or open a repository
//! - `add`: stage and unstage files
//! - `commit`: snapshot the index, finishing a pending merge if there is one
//! - `status`: staged and working-tree changes
//! - `branch`: create, delete and list branches and tags
//! - `checkout`: move HEAD and restage its tree
//! - `diff`: compare revisions, or a revision with the index
//! - `log`: history, ancestry and reachability
//! - `merge`: merge base and three-way merges
//! - `clone`: copy a repository with its full reachable history

pub mod add;
pub mod branch;
pub mod checkout;
pub mod clone;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod merge;
pub mod status;
