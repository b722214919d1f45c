use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use vsx::areas::refs::{HEAD_REF_NAME, Head};
use vsx::artifacts::branch::branch_name::{BranchName, HEADS_PREFIX, TAGS_PREFIX};
use vsx::artifacts::diff::ContentDiff;
use vsx::artifacts::diff::hunk::{DEFAULT_CONTEXT, Hunk};
use vsx::artifacts::diff::tree_diff::{DiffFilter, DiffReport};
use vsx::artifacts::merge::MergeOutcome;
use vsx::artifacts::merge::merge_state::MergeState;
use vsx::artifacts::objects::commit::Commit;
use vsx::artifacts::objects::object_id::ObjectId;
use vsx::artifacts::status::file_change::{FileChangeType, IndexChangeType, WorkspaceChangeType};
use vsx::artifacts::status::status_info::{StatusReport, WorkspaceChanges};

const NULL_OID: &str = "0000000";
const FILE_MODE: &str = "100644";

pub fn head_description(head: &Head) -> String {
    match head {
        Head::Attached(branch) => format!("On branch {branch}"),
        Head::Detached(oid) => format!("HEAD detached at {}", oid.to_short_oid()),
    }
}

/// Long-form `status`
pub fn status(
    head: &Head,
    unborn: bool,
    pending: Option<(&MergeState, Vec<PathBuf>)>,
    staged: &StatusReport,
    workspace: &WorkspaceChanges,
) -> String {
    let mut lines = vec![head_description(head)];
    if unborn {
        lines.push(String::new());
        lines.push("No commits yet".to_string());
    }

    if let Some((state, unresolved)) = &pending {
        lines.push(String::new());
        if unresolved.is_empty() {
            lines.push("All conflicts fixed but you are still merging.".to_string());
            lines.push("  (use \"vsx commit\" to conclude merge)".to_string());
        } else {
            lines.push(format!("You have unmerged paths from '{}'.", state.source));
            lines.push("  (fix conflicts, stage them and run \"vsx commit\")".to_string());
            lines.push(String::new());
            lines.push("Unmerged paths:".to_string());
            for path in unresolved {
                lines.push(format!(
                    "{:>8}{}{}",
                    "",
                    "both modified:   ".red(),
                    path.display()
                ));
            }
        }
    }

    let staged_changes = staged.changes();
    if !staged_changes.is_empty() {
        lines.push(String::new());
        lines.push("Changes to be committed:".to_string());
        for (path, change) in &staged_changes {
            lines.push(format!(
                "{}{}",
                FileChangeType::Index(*change),
                path.display()
            ));
        }
    }

    let workspace_changes = workspace.changes();
    if !workspace_changes.is_empty() {
        lines.push(String::new());
        lines.push("Changes not staged for commit:".to_string());
        for (path, change) in &workspace_changes {
            lines.push(format!(
                "{}{}",
                FileChangeType::Workspace(*change),
                path.display()
            ));
        }
    }

    if !workspace.untracked.is_empty() {
        lines.push(String::new());
        lines.push("Untracked files:".to_string());
        for path in &workspace.untracked {
            lines.push(format!("{:>8}{}", "", path.display().to_string().red()));
        }
    }

    if staged_changes.is_empty() && workspace.is_clean() && pending.is_none() {
        lines.push(String::new());
        lines.push("nothing to commit, working tree clean".to_string());
    }

    lines.join("\n")
}

/// Two-column `status --porcelain`: index code, then working-tree code
pub fn status_porcelain(staged: &StatusReport, workspace: &WorkspaceChanges) -> String {
    let mut columns: BTreeMap<PathBuf, (Option<IndexChangeType>, Option<WorkspaceChangeType>)> =
        BTreeMap::new();
    for (path, change) in staged.changes() {
        columns.entry(path).or_default().0 = Some(change);
    }
    for (path, change) in workspace.changes() {
        columns.entry(path).or_default().1 = Some(change);
    }

    let tracked = columns.into_iter().map(|(path, (index, work))| {
        format!(
            "{}{} {}",
            index.map_or(" ", |c| c.code()),
            work.map_or(" ", |c| c.code()),
            path.display()
        )
    });
    let untracked = workspace.untracked.iter().map(|path| {
        format!(
            "{} {}",
            WorkspaceChangeType::Untracked.code(),
            path.display()
        )
    });

    tracked.chain(untracked).collect::<Vec<_>>().join("\n")
}

pub fn branches(branches: &[(BranchName, ObjectId)], current: Option<&BranchName>) -> String {
    branches
        .iter()
        .map(|(name, _)| {
            if Some(name) == current {
                format!("* {}", name.to_string().green())
            } else {
                format!("  {name}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `[main (root-commit) 1a2b3c4] message`
pub fn commit_summary(head: &Head, oid: &ObjectId, commit: &Commit) -> String {
    let location = match head {
        Head::Attached(branch) => branch.to_string(),
        Head::Detached(_) => "detached HEAD".to_string(),
    };
    let root = if commit.parents().is_empty() {
        " (root-commit)"
    } else {
        ""
    };

    format!(
        "[{location}{root} {}] {}",
        oid.to_short_oid(),
        commit.short_message()
    )
}

/// ` (HEAD -> main, feature, tag: v1)`, or nothing when no reference points here
pub fn decoration(head: &Head, names: Option<&Vec<String>>) -> String {
    let Some(names) = names else {
        return String::new();
    };

    let mut parts = Vec::new();
    let attached = head.branch().map(BranchName::to_ref_name);
    if names.iter().any(|name| name == HEAD_REF_NAME) {
        let label = match head {
            Head::Attached(branch) => format!("{HEAD_REF_NAME} -> {branch}"),
            Head::Detached(_) => HEAD_REF_NAME.to_string(),
        };
        parts.push(label.cyan().bold().to_string());
    }
    for name in names {
        if name == HEAD_REF_NAME
            || (names.iter().any(|n| n == HEAD_REF_NAME) && Some(name) == attached.as_ref())
        {
            continue;
        }
        if let Some(branch) = name.strip_prefix(HEADS_PREFIX) {
            parts.push(branch.green().bold().to_string());
        } else if let Some(tag) = name.strip_prefix(TAGS_PREFIX) {
            parts.push(format!("tag: {tag}").yellow().bold().to_string());
        } else {
            parts.push(name.clone());
        }
    }

    if parts.is_empty() {
        return String::new();
    }
    let separator = ", ".yellow().to_string();
    format!(
        " {}{}{}",
        "(".yellow(),
        parts.join(separator.as_str()),
        ")".yellow()
    )
}

/// One commit in `log`'s default multi-line layout
pub fn log_medium(oid: &ObjectId, commit: &Commit, decoration: &str) -> String {
    let mut lines = vec![format!("{}{decoration}", format!("commit {oid}").yellow())];
    if commit.is_merge() {
        let parents = commit
            .parents()
            .iter()
            .map(ObjectId::to_short_oid)
            .collect::<Vec<_>>();
        lines.push(format!("Merge: {}", parents.join(" ")));
    }
    lines.push(format!("Author: {}", commit.author().display_name()));
    lines.push(format!("Date:   {}", commit.author().readable_timestamp()));
    lines.push(String::new());
    lines.extend(commit.message().lines().map(|line| format!("    {line}")));

    lines.join("\n")
}

pub fn log_oneline(oid: &ObjectId, commit: &Commit, decoration: &str) -> String {
    format!(
        "{}{decoration} {}",
        oid.to_short_oid().yellow(),
        commit.short_message()
    )
}

pub fn name_status(report: &DiffReport, filter: DiffFilter) -> String {
    report
        .filtered(filter)
        .map(|(path, diff)| format!("{}\t{}", diff.status_char(), path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Unified patch for one file; `old` and `new` are `None` on the missing side
pub fn file_patch(
    path: &Path,
    old: Option<&ObjectId>,
    new: Option<&ObjectId>,
    content: &ContentDiff,
) -> String {
    let path = path.display();
    let mut lines = vec![format!("diff --git a/{path} b/{path}").bold().to_string()];

    let short = |oid: Option<&ObjectId>| oid.map_or(NULL_OID.to_string(), ObjectId::to_short_oid);
    match (old, new) {
        (None, Some(_)) => {
            lines.push(format!("new file mode {FILE_MODE}").bold().to_string());
            lines.push(format!("index {}..{}", short(old), short(new)).bold().to_string());
        }
        (Some(_), None) => {
            lines.push(format!("deleted file mode {FILE_MODE}").bold().to_string());
            lines.push(format!("index {}..{}", short(old), short(new)).bold().to_string());
        }
        _ => lines.push(
            format!("index {}..{} {FILE_MODE}", short(old), short(new))
                .bold()
                .to_string(),
        ),
    }

    if matches!(content, ContentDiff::Binary) {
        lines.push(format!("Binary files a/{path} and b/{path} differ"));
        return lines.join("\n");
    }

    let old_name = old.map_or("/dev/null".to_string(), |_| format!("a/{path}"));
    let new_name = new.map_or("/dev/null".to_string(), |_| format!("b/{path}"));
    lines.push(format!("--- {old_name}").bold().to_string());
    lines.push(format!("+++ {new_name}").bold().to_string());

    for hunk in Hunk::build(content.runs(), DEFAULT_CONTEXT) {
        lines.push(hunk.header().cyan().to_string());
        for line in hunk.body_lines() {
            lines.push(match line.chars().next() {
                Some('+') => line.green().to_string(),
                Some('-') => line.red().to_string(),
                _ => line,
            });
        }
    }

    lines.join("\n")
}

pub fn merge_outcome(outcome: &MergeOutcome, source: &str, target: &str) -> String {
    match outcome {
        MergeOutcome::UpToDate => "Already up to date.".to_string(),
        MergeOutcome::FastForward { commit } => {
            format!("Fast-forward {target} to {}", commit.to_short_oid())
        }
        MergeOutcome::Merged { commit, .. } => format!(
            "Merged {source} into {target} as {}\nMerge made by the 'three-way' strategy.",
            commit.to_short_oid()
        ),
        MergeOutcome::Conflicted { result } => {
            let mut lines = result
                .conflicts
                .iter()
                .map(|conflict| {
                    format!(
                        "CONFLICT ({}): Merge conflict in {}",
                        conflict.kind,
                        conflict.path.display()
                    )
                })
                .collect::<Vec<_>>();
            lines.push(
                "Automatic merge failed; fix conflicts and then commit the result.".to_string(),
            );
            lines.join("\n")
        }
    }
}
