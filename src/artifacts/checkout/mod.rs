//! Checkout planning
//!
//! Switching HEAD to another commit is described by a [`migration::Migration`]: the
//! files to add, delete and modify, and the directories to create and remove, so
//! that a working directory showing one tree ends up showing another. The plan is
//! computed purely from the two flattened trees; applying it is the workspace's job.

pub mod migration;

use crate::areas::refs::Head;
use crate::artifacts::checkout::migration::Migration;

/// Outcome of a checkout: where HEAD now points and how the files must change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReport {
    pub head: Head,
    pub migration: Migration,
}
