//! Diff engine
//!
//! - `myers`: Myers' O(ND) edit script over any sequence
//! - `tree_diff`: which files differ between two trees
//! - `hunk`: unified hunks with surrounding context, for display
//!
//! Content is compared line by line. Lines are split after `\n` and keep their
//! terminator, so a missing final newline or a `\r\n` ending is a change; a blob
//! that is not UTF-8 text (or holds a NUL byte) is reported as
//! [`ContentDiff::Binary`] and never diffed.

pub mod hunk;
pub mod myers;
pub mod tree_diff;

use crate::artifacts::diff::myers::{Edit, MyersDiff};
use crate::artifacts::objects::blob::Blob;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Equal,
    Insert,
    Delete,
}

/// Consecutive lines sharing one edit kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRun {
    pub kind: EditKind,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentDiff {
    Text(Vec<EditRun>),
    Binary,
}

impl ContentDiff {
    pub fn runs(&self) -> &[EditRun] {
        match self {
            ContentDiff::Text(runs) => runs,
            ContentDiff::Binary => &[],
        }
    }

    /// Number of runs of the given kind
    pub fn count_runs(&self, kind: EditKind) -> usize {
        self.runs().iter().filter(|run| run.kind == kind).count()
    }

    pub fn is_identical(&self) -> bool {
        self.runs().iter().all(|run| run.kind == EditKind::Equal)
            && !matches!(self, ContentDiff::Binary)
    }
}

pub fn diff_blobs(left: &Blob, right: &Blob) -> ContentDiff {
    match (left.as_text(), right.as_text()) {
        (Some(left), Some(right)) => ContentDiff::Text(diff_lines(left, right)),
        _ => ContentDiff::Binary,
    }
}

pub fn diff_lines(left: &str, right: &str) -> Vec<EditRun> {
    let left = left.split_inclusive('\n').collect::<Vec<_>>();
    let right = right.split_inclusive('\n').collect::<Vec<_>>();

    group_runs(MyersDiff::new(&left, &right).diff())
}

fn group_runs(edits: Vec<Edit<&str>>) -> Vec<EditRun> {
    let mut runs: Vec<EditRun> = Vec::new();

    for edit in edits {
        let (kind, line) = match edit {
            Edit::Equal { value } => (EditKind::Equal, value),
            Edit::Insert { value } => (EditKind::Insert, value),
            Edit::Delete { value } => (EditKind::Delete, value),
        };

        match runs.last_mut() {
            Some(run) if run.kind == kind => run.lines.push(line.to_string()),
            _ => runs.push(EditRun {
                kind,
                lines: vec![line.to_string()],
            }),
        }
    }

    runs
}
