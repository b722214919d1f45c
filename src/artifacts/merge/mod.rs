//! Merge algorithms
//!
//! - `bca_finder`: best common ancestor (merge base) of two commits
//! - `three_way`: path-by-path three-way merge of trees with conflict markers
//! - `merge_state`: the pending-merge record left behind by a conflicted merge

pub mod bca_finder;
pub mod merge_state;
pub mod three_way;

use crate::artifacts::merge::three_way::MergeResult;
use crate::artifacts::objects::object_id::ObjectId;

/// What a merge did to the target branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The source is already contained in the target
    UpToDate,
    /// The target was moved forward to the source
    FastForward { commit: ObjectId },
    /// A two-parent merge commit was written
    Merged { commit: ObjectId, result: MergeResult },
    /// Nothing was committed; conflicts need resolving first
    Conflicted { result: MergeResult },
}
