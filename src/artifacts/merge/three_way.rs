//! Three-way tree merge
//!
//! Every path present in the base, ours or theirs is decided independently:
//!
//! | base | ours | theirs | result |
//! |------|------|--------|--------|
//! | any  | X    | X      | X (includes both deleted) |
//! | B    | B    | T      | T (includes theirs' deletion) |
//! | B    | O    | B      | O (includes ours' deletion) |
//! | any  | O    | T      | conflict |
//!
//! A conflict still produces content so the merged tree always materializes:
//! text is wrapped in conflict markers, binary content keeps ours, and a
//! delete/modify keeps the modified side.
//!
//! When the merged paths leave a file where the other side put a directory,
//! the directory stays and the file moves aside to `<name>~<label>`, with the
//! label of the side that brought the file.

use crate::areas::database::Database;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeBuilder};
use crate::artifacts::status::status_info::FileMap;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

pub const CONFLICT_MARKER_OURS: &str = "<<<<<<<";
pub const CONFLICT_MARKER_SEPARATOR: &str = "=======";
pub const CONFLICT_MARKER_THEIRS: &str = ">>>>>>>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Ours,
    Theirs,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Ours => write!(f, "ours"),
            Side::Theirs => write!(f, "theirs"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Both sides changed the text differently
    Content,
    /// Both sides added the path with different text
    AddAdd,
    /// At least one side is binary; ours was kept
    Binary,
    /// Deleted on one side, changed on the other; the change was kept
    DeleteModify { deleted_in: Side },
    /// A file on one side sits where the other has a directory; the file
    /// was renamed to `<name>~<label>`
    FileDirectory { file_in: Side },
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::Content => write!(f, "content"),
            ConflictKind::AddAdd => write!(f, "add/add"),
            ConflictKind::Binary => write!(f, "binary"),
            ConflictKind::DeleteModify { deleted_in } => {
                write!(f, "delete/modify (deleted in {deleted_in})")
            }
            ConflictKind::FileDirectory { file_in } => {
                write!(f, "file/directory (file in {file_in})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub path: PathBuf,
    pub kind: ConflictKind,
    /// Blob staged for the path after the merge (marker text for text conflicts)
    pub staged: ObjectId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub tree: ObjectId,
    /// Ordered by path
    pub conflicts: Vec<Conflict>,
}

impl MergeResult {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn conflicted_paths(&self) -> Vec<PathBuf> {
        self.conflicts.iter().map(|c| c.path.clone()).collect()
    }
}

/// Names written after the opening and closing conflict markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeLabels {
    pub ours: String,
    pub theirs: String,
}

impl MergeLabels {
    pub fn new(ours: impl Into<String>, theirs: impl Into<String>) -> Self {
        MergeLabels {
            ours: ours.into(),
            theirs: theirs.into(),
        }
    }
}

impl Default for MergeLabels {
    fn default() -> Self {
        MergeLabels::new("ours", "theirs")
    }
}

#[derive(Debug)]
pub struct ThreeWayMerge<'r> {
    database: &'r Database,
    labels: MergeLabels,
}

impl<'r> ThreeWayMerge<'r> {
    pub fn new(database: &'r Database, labels: MergeLabels) -> Self {
        ThreeWayMerge { database, labels }
    }

    /// Merge three stored trees and store the merged tree
    pub fn merge_trees(
        &self,
        base: &ObjectId,
        ours: &ObjectId,
        theirs: &ObjectId,
    ) -> Result<MergeResult> {
        let base = self.database.flatten_tree(base)?;
        let ours = self.database.flatten_tree(ours)?;
        let theirs = self.database.flatten_tree(theirs)?;

        let (merged, conflicts) = self.merge_file_maps(&base, &ours, &theirs)?;

        let tree = TreeBuilder::build(merged.iter().map(|(path, oid)| (path.as_path(), oid)))?
            .write(&mut |tree: &Tree| self.database.store(tree))?;

        tracing::debug!(%tree, conflicts = conflicts.len(), "merged trees");

        Ok(MergeResult { tree, conflicts })
    }

    /// Decide every path of the union; conflicts come back in path order
    pub fn merge_file_maps(
        &self,
        base: &FileMap,
        ours: &FileMap,
        theirs: &FileMap,
    ) -> Result<(FileMap, Vec<Conflict>)> {
        let paths = base
            .keys()
            .chain(ours.keys())
            .chain(theirs.keys())
            .collect::<BTreeSet<_>>();

        let mut merged = FileMap::new();
        let mut conflicts = Vec::new();

        for path in paths {
            let (b, o, t) = (base.get(path), ours.get(path), theirs.get(path));

            let resolved = if o == t {
                o.cloned()
            } else if b == o {
                t.cloned()
            } else if b == t {
                o.cloned()
            } else {
                let (staged, kind) = self.resolve_conflict(b, o, t)?;
                tracing::debug!(path = %path.display(), %kind, "conflict");
                conflicts.push(Conflict {
                    path: path.clone(),
                    kind,
                    staged: staged.clone(),
                });
                Some(staged)
            };

            if let Some(oid) = resolved {
                merged.insert(path.clone(), oid);
            }
        }

        self.move_shadowed_files(&mut merged, &mut conflicts, ours);
        conflicts.sort_by(|a, b| a.path.cmp(&b.path));

        Ok((merged, conflicts))
    }

    /// Files whose path is also a directory prefix of another merged path.
    /// Component ordering puts a path's descendants right after it.
    fn move_shadowed_files(
        &self,
        merged: &mut FileMap,
        conflicts: &mut Vec<Conflict>,
        ours: &FileMap,
    ) {
        let shadowed = merged
            .keys()
            .zip(merged.keys().skip(1))
            .filter(|(file, next)| next.starts_with(file))
            .map(|(file, _)| file.clone())
            .collect::<Vec<_>>();

        for path in shadowed {
            let Some(oid) = merged.remove(&path) else {
                continue;
            };
            let file_in = if ours.get(&path) == Some(&oid) {
                Side::Ours
            } else {
                Side::Theirs
            };
            let label = match file_in {
                Side::Ours => &self.labels.ours,
                Side::Theirs => &self.labels.theirs,
            };
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let renamed = path.with_file_name(format!("{name}~{}", label.replace('/', "_")));

            tracing::debug!(
                path = %path.display(),
                renamed = %renamed.display(),
                "file/directory conflict"
            );

            conflicts.retain(|conflict| conflict.path != path);
            conflicts.push(Conflict {
                path: renamed.clone(),
                kind: ConflictKind::FileDirectory { file_in },
                staged: oid.clone(),
            });
            merged.insert(renamed, oid);
        }
    }

    fn resolve_conflict(
        &self,
        base: Option<&ObjectId>,
        ours: Option<&ObjectId>,
        theirs: Option<&ObjectId>,
    ) -> Result<(ObjectId, ConflictKind)> {
        match (ours, theirs) {
            (None, Some(theirs)) => Ok((
                theirs.clone(),
                ConflictKind::DeleteModify {
                    deleted_in: Side::Ours,
                },
            )),
            (Some(ours), None) => Ok((
                ours.clone(),
                ConflictKind::DeleteModify {
                    deleted_in: Side::Theirs,
                },
            )),
            (Some(ours), Some(theirs)) => {
                let ours_blob = self.database.load_blob(ours)?;
                let theirs_blob = self.database.load_blob(theirs)?;

                match (ours_blob.as_text(), theirs_blob.as_text()) {
                    (Some(ours_text), Some(theirs_text)) => {
                        let merged = merge_text(ours_text, theirs_text, &self.labels);
                        let oid = self.database.store(&Blob::from_text(merged))?;
                        let kind = match base {
                            Some(_) => ConflictKind::Content,
                            None => ConflictKind::AddAdd,
                        };
                        Ok((oid, kind))
                    }
                    _ => Ok((ours.clone(), ConflictKind::Binary)),
                }
            }
            // o == t already covered both sides missing
            (None, None) => unreachable!("identical sides never conflict"),
        }
    }
}

/// Keep the lines both sides share at the start and end, and mark up the rest
pub fn merge_text(ours: &str, theirs: &str, labels: &MergeLabels) -> String {
    let ours_lines = ours.split_inclusive('\n').collect::<Vec<_>>();
    let theirs_lines = theirs.split_inclusive('\n').collect::<Vec<_>>();

    let prefix = ours_lines
        .iter()
        .zip(&theirs_lines)
        .take_while(|(o, t)| o == t)
        .count();
    let max_suffix = ours_lines.len().min(theirs_lines.len()) - prefix;
    let suffix = ours_lines
        .iter()
        .rev()
        .zip(theirs_lines.iter().rev())
        .take(max_suffix)
        .take_while(|(o, t)| o == t)
        .count();

    let mut merged = String::with_capacity(ours.len() + theirs.len() + 64);
    merged.extend(ours_lines[..prefix].iter().copied());

    merged.push_str(&format!("{CONFLICT_MARKER_OURS} {}\n", labels.ours));
    push_block(&mut merged, &ours_lines[prefix..ours_lines.len() - suffix]);
    merged.push_str(CONFLICT_MARKER_SEPARATOR);
    merged.push('\n');
    push_block(&mut merged, &theirs_lines[prefix..theirs_lines.len() - suffix]);
    merged.push_str(&format!("{CONFLICT_MARKER_THEIRS} {}\n", labels.theirs));

    merged.extend(ours_lines[ours_lines.len() - suffix..].iter().copied());
    merged
}

fn push_block(merged: &mut String, lines: &[&str]) {
    merged.extend(lines.iter().copied());
    if !merged.ends_with('\n') {
        merged.push('\n');
    }
}

/// Whether text still carries an unresolved conflict block
pub fn has_conflict_markers(text: &str) -> bool {
    let mut open = false;
    for line in text.lines() {
        if line.starts_with(CONFLICT_MARKER_OURS) {
            open = true;
        } else if open && line.starts_with(CONFLICT_MARKER_THEIRS) {
            return true;
        }
    }
    false
}
