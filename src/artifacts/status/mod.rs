//! Staged and working-tree status
//!
//! - `file_change`: change kinds and their rendering
//! - `status_info`: the staged report (index vs a base tree) and working-tree changes

pub mod file_change;
pub mod status_info;
