use crate::artifacts::diff::myers::Edit;
use crate::artifacts::diff::{EditKind, EditRun};
use std::fmt;

/// Lines of unchanged context kept around each change
pub const DEFAULT_CONTEXT: usize = 3;

/// Follows a shown line that had no terminator
pub const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

/// One `@@ -a,b +c,d @@` block of a unified diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    a_start: usize,
    b_start: usize,
    edits: Vec<Edit<String>>,
}

struct NumberedEdit<'r> {
    edit: Edit<&'r str>,
    // lines of each side consumed before this edit
    a_line: usize,
    b_line: usize,
}

impl Hunk {
    /// Group an edit script into hunks, merging changes whose context overlaps
    pub fn build(runs: &[EditRun], context: usize) -> Vec<Hunk> {
        let numbered = number_edits(runs);
        let changes = numbered
            .iter()
            .enumerate()
            .filter(|(_, e)| !matches!(e.edit, Edit::Equal { .. }))
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        let mut hunks = Vec::new();
        let mut next = 0;
        while next < changes.len() {
            let first = changes[next];
            let mut last = first;
            next += 1;

            while next < changes.len() && changes[next] - last - 1 <= 2 * context {
                last = changes[next];
                next += 1;
            }

            let start = first.saturating_sub(context);
            let end = (last + context).min(numbered.len() - 1);
            let slice = &numbered[start..=end];

            hunks.push(Hunk {
                a_start: slice[0].a_line,
                b_start: slice[0].b_line,
                edits: slice
                    .iter()
                    .map(|numbered| match numbered.edit {
                        Edit::Equal { value } => Edit::Equal {
                            value: value.to_string(),
                        },
                        Edit::Insert { value } => Edit::Insert {
                            value: value.to_string(),
                        },
                        Edit::Delete { value } => Edit::Delete {
                            value: value.to_string(),
                        },
                    })
                    .collect(),
            });
        }

        hunks
    }

    /// First old line shown, 1-based; the line before the hunk when it is empty
    pub fn a_start(&self) -> usize {
        if self.a_size() == 0 {
            self.a_start
        } else {
            self.a_start + 1
        }
    }

    pub fn b_start(&self) -> usize {
        if self.b_size() == 0 {
            self.b_start
        } else {
            self.b_start + 1
        }
    }

    pub fn a_size(&self) -> usize {
        self.edits
            .iter()
            .filter(|e| !matches!(e, Edit::Insert { .. }))
            .count()
    }

    pub fn b_size(&self) -> usize {
        self.edits
            .iter()
            .filter(|e| !matches!(e, Edit::Delete { .. }))
            .count()
    }

    /// Prefixed display lines without terminators, each unterminated source
    /// line followed by [`NO_NEWLINE_MARKER`]
    pub fn body_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.edits.len());

        for edit in &self.edits {
            let (sign, value) = match edit {
                Edit::Equal { value } => (' ', value),
                Edit::Insert { value } => ('+', value),
                Edit::Delete { value } => ('-', value),
            };
            match value.strip_suffix('\n') {
                Some(line) => lines.push(format!("{sign}{line}")),
                None => {
                    lines.push(format!("{sign}{value}"));
                    lines.push(NO_NEWLINE_MARKER.to_string());
                }
            }
        }

        lines
    }

    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.a_start(),
            self.a_size(),
            self.b_start(),
            self.b_size()
        )
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        for line in self.body_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn number_edits(runs: &[EditRun]) -> Vec<NumberedEdit<'_>> {
    let (mut a_line, mut b_line) = (0, 0);
    let mut numbered = Vec::new();

    for run in runs {
        for line in &run.lines {
            let value = line.as_str();
            let edit = match run.kind {
                EditKind::Equal => Edit::Equal { value },
                EditKind::Insert => Edit::Insert { value },
                EditKind::Delete => Edit::Delete { value },
            };
            numbered.push(NumberedEdit {
                edit,
                a_line,
                b_line,
            });

            match run.kind {
                EditKind::Equal => {
                    a_line += 1;
                    b_line += 1;
                }
                EditKind::Insert => b_line += 1,
                EditKind::Delete => a_line += 1,
            }
        }
    }

    numbered
}
