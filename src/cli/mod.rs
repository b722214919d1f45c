//! Command handlers behind the `vsx` binary
//!
//! The engine only ever touches `.vsx/`; these handlers read the working
//! directory, apply checkout and merge migrations to it, and render results.

pub mod render;

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use vsx::areas::refs::Head;
use vsx::areas::repository::Repository;
use vsx::areas::workspace::Workspace;
use vsx::artifacts::checkout::migration::Migration;
use vsx::artifacts::diff::tree_diff::{DiffFilter, DiffReport, FileDiff};
use vsx::artifacts::diff::diff_blobs;
use vsx::artifacts::merge::MergeOutcome;
use vsx::artifacts::merge::merge_state::MergeState;
use vsx::artifacts::objects::blob::Blob;
use vsx::artifacts::objects::object_type::ObjectType;
use vsx::artifacts::status::status_info::FileMap;
use vsx::commands::plumbing::hash_object::blob_id;

/// Repository and working directory found from the current directory
pub struct Session {
    pub repository: Repository,
    pub workspace: Workspace,
}

impl Session {
    pub fn open() -> Result<Self> {
        let pwd = std::env::current_dir()?;
        let repository = Repository::discover(&pwd)?;
        let workspace = Workspace::new(repository.path())?;

        Ok(Session {
            repository,
            workspace,
        })
    }

    /// Workspace-relative form of a path given on the command line
    fn relativize(&self, path: &str) -> Result<PathBuf> {
        self.workspace
            .relativize(Path::new(path))
            .with_context(|| format!("'{path}' is outside the repository"))
    }

    /// Fail when tracked files carry edits that a migration could overwrite
    fn ensure_clean_workspace(&self, action: &str) -> Result<()> {
        let changes = self.repository.workspace_status(&self.workspace)?.changes();
        if !changes.is_empty() {
            let paths = changes
                .keys()
                .map(|path| format!("\t{}", path.display()))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("your local changes would be overwritten by {action}:\n{paths}");
        }

        Ok(())
    }

    fn apply(&self, migration: &Migration) -> Result<()> {
        self.workspace
            .apply_migration(migration, self.repository.database())
            .context("failed to update the working directory")
    }
}

pub fn init(path: Option<String>) -> Result<()> {
    let path = match path {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };
    std::fs::create_dir_all(&path)
        .with_context(|| format!("cannot create {}", path.display()))?;

    let repository = Repository::init(path.canonicalize()?)?;
    println!(
        "Initialized empty vsx repository in {}",
        repository.metadata_path().display()
    );

    Ok(())
}

pub fn add(paths: &[String]) -> Result<()> {
    let session = Session::open()?;
    let mut files = Vec::new();
    let mut missing = Vec::new();

    for path in paths {
        let relative = session.relativize(path)?;
        let root = (!relative.as_os_str().is_empty()).then_some(relative.as_path());
        let tracked = session.repository.index().entries_under_path(&relative);
        let exists = root.is_none() || session.repository.path().join(&relative).exists();

        if !exists && tracked.is_empty() {
            bail!("pathspec '{path}' did not match any files");
        }
        if exists {
            files.extend(session.workspace.list_files(root)?);
        }
        // tracked files gone from the working directory leave the index
        missing.extend(
            tracked
                .into_iter()
                .filter(|tracked| !session.workspace.file_exists(tracked)),
        );
    }

    session.repository.stage_files(&files, &session.workspace)?;
    if !missing.is_empty() {
        session.repository.unstage(&missing)?;
    }

    Ok(())
}

pub fn rm(paths: &[String], cached: bool) -> Result<()> {
    let session = Session::open()?;
    let mut relative_paths = Vec::new();

    for path in paths {
        let relative = session.relativize(path)?;
        if !session.repository.index().is_tracked(&relative) {
            bail!("pathspec '{path}' did not match any tracked files");
        }
        relative_paths.push(relative);
    }

    if !cached {
        let tracked = relative_paths
            .iter()
            .flat_map(|path| session.repository.index().entries_under_path(path))
            .collect::<Vec<_>>();
        for path in tracked {
            let absolute = session.repository.path().join(&path);
            if absolute.is_file() {
                std::fs::remove_file(&absolute)
                    .with_context(|| format!("cannot remove {}", absolute.display()))?;
            }
            println!("rm '{}'", path.display());
        }
    }

    session.repository.unstage(&relative_paths)?;
    Ok(())
}

pub fn commit(message: &str) -> Result<()> {
    let session = Session::open()?;
    let repository = &session.repository;

    let author = repository.config().author()?;
    let oid = repository.commit(message, author)?;
    let commit = repository.database().load_commit(&oid)?;

    println!(
        "{}",
        render::commit_summary(&repository.refs().head()?, &oid, &commit)
    );
    Ok(())
}

pub fn status(porcelain: bool) -> Result<()> {
    let session = Session::open()?;
    let repository = &session.repository;

    let staged = repository.status()?;
    let workspace = repository.workspace_status(&session.workspace)?;

    if porcelain {
        let output = render::status_porcelain(&staged, &workspace);
        if !output.is_empty() {
            println!("{output}");
        }
        return Ok(());
    }

    let pending = repository.pending_merge()?;
    let unresolved = pending.as_ref().map(MergeState::unresolved);

    println!(
        "{}",
        render::status(
            &repository.refs().head()?,
            repository.refs().read_head()?.is_none(),
            pending.as_ref().zip(unresolved),
            &staged,
            &workspace,
        )
    );
    Ok(())
}

pub fn branch(name: Option<String>, start: Option<String>, delete: bool) -> Result<()> {
    let session = Session::open()?;
    let repository = &session.repository;

    match (name, delete) {
        (Some(name), true) => {
            let oid = repository.delete_branch(&name)?;
            println!("Deleted branch {name} (was {}).", oid.to_short_oid());
        }
        (None, true) => bail!("branch name required"),
        (Some(name), false) => {
            repository.create_branch(&name, start.as_deref())?;
        }
        (None, false) => {
            let head = repository.refs().head()?;
            let output = render::branches(&repository.list_branches()?, head.branch());
            if !output.is_empty() {
                println!("{output}");
            }
        }
    }

    Ok(())
}

pub fn tag(name: Option<String>, start: Option<String>) -> Result<()> {
    let session = Session::open()?;
    let repository = &session.repository;

    match name {
        Some(name) => {
            repository.create_tag(&name, start.as_deref())?;
        }
        None => {
            for (tag, _) in repository.list_tags()? {
                println!("{tag}");
            }
        }
    }

    Ok(())
}

pub fn checkout(target: &str, force: bool) -> Result<()> {
    let session = Session::open()?;
    if !force {
        session.ensure_clean_workspace("checkout")?;
    }

    let report = session.repository.checkout(target, force)?;
    session.apply(&report.migration)?;

    match &report.head {
        Head::Attached(branch) => eprintln!("Switched to branch '{branch}'"),
        Head::Detached(oid) => {
            let commit = session.repository.database().load_commit(oid)?;
            eprintln!("Note: switching to '{target}'.");
            eprintln!();
            eprintln!("You are in 'detached HEAD' state. Commits made here belong to no branch.");
            eprintln!();
            eprintln!(
                "HEAD is now at {} {}",
                oid.to_short_oid(),
                commit.short_message()
            );
        }
    }

    Ok(())
}

pub struct DiffOptions {
    pub revisions: Vec<String>,
    pub cached: bool,
    pub name_status: bool,
    pub filter: Option<String>,
}

pub fn diff(options: DiffOptions) -> Result<()> {
    let session = Session::open()?;
    let repository = &session.repository;

    let filter = match &options.filter {
        Some(filter) => DiffFilter::try_parse(filter)
            .with_context(|| format!("invalid --diff-filter '{filter}', expected A, D or M"))?,
        None => DiffFilter::all(),
    };

    let report = match (options.cached, options.revisions.as_slice()) {
        (true, [rev]) => repository.diff_staged(Some(rev))?,
        (true, []) => repository.diff_staged(None)?,
        (false, [a, b]) => repository.diff(a, b)?,
        (false, [a]) => repository.diff(a, "HEAD")?,
        (false, []) => return diff_workspace(&session, filter, options.name_status),
        _ => bail!("too many revisions"),
    };

    let output = if options.name_status {
        render::name_status(&report, filter)
    } else {
        patch(repository, &report, filter)?
    };
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}

fn patch(repository: &Repository, report: &DiffReport, filter: DiffFilter) -> Result<String> {
    let empty = Blob::from_text("");
    let mut patches = Vec::new();

    for (path, file_diff) in report.filtered(filter) {
        let patch = match file_diff {
            FileDiff::Added(new) => {
                let content = diff_blobs(&empty, &repository.database().load_blob(new)?);
                render::file_patch(path, None, Some(new), &content)
            }
            FileDiff::Deleted(old) => {
                let content = diff_blobs(&repository.database().load_blob(old)?, &empty);
                render::file_patch(path, Some(old), None, &content)
            }
            FileDiff::Modified { old, new, content } => {
                render::file_patch(path, Some(old), Some(new), content)
            }
            FileDiff::Unchanged(_) => continue,
        };
        patches.push(patch);
    }

    Ok(patches.join("\n"))
}

/// Unstaged edits: the index against the working directory
fn diff_workspace(session: &Session, filter: DiffFilter, name_status: bool) -> Result<()> {
    let repository = &session.repository;
    let staged = repository.index().file_map();
    let changes = repository.workspace_status(&session.workspace)?;
    let mut output = Vec::new();

    let modified = changes
        .modified
        .iter()
        .filter(|_| filter.contains(DiffFilter::MODIFIED));
    for path in modified {
        let Some(old) = staged.get(path) else {
            continue;
        };
        if name_status {
            output.push(format!("M\t{}", path.display()));
            continue;
        }
        let work = session.workspace.read_file(path)?;
        let new = blob_id(work.clone())?;
        let content = diff_blobs(&repository.database().load_blob(old)?, &Blob::new(work));
        output.push(render::file_patch(path, Some(old), Some(&new), &content));
    }

    let deleted = changes
        .deleted
        .iter()
        .filter(|_| filter.contains(DiffFilter::DELETED));
    for path in deleted {
        let Some(old) = staged.get(path) else {
            continue;
        };
        if name_status {
            output.push(format!("D\t{}", path.display()));
            continue;
        }
        let content = diff_blobs(
            &repository.database().load_blob(old)?,
            &Blob::new(Bytes::new()),
        );
        output.push(render::file_patch(path, Some(old), None, &content));
    }

    if !output.is_empty() {
        println!("{}", output.join("\n"));
    }
    Ok(())
}

pub fn log(revisions: &[String], oneline: bool) -> Result<()> {
    let session = Session::open()?;
    let repository = &session.repository;

    if revisions.is_empty() && repository.refs().read_head()?.is_none() {
        return Ok(());
    }
    let revisions = if revisions.is_empty() {
        vec!["HEAD"]
    } else {
        revisions.iter().map(String::as_str).collect()
    };

    let head = repository.refs().head()?;
    let reversed = repository.refs().reverse_refs()?;
    let separator = if oneline { "" } else { "\n" };

    let mut first = true;
    for entry in &repository.log_many(&revisions)? {
        let (oid, commit) = entry?;
        let decoration = render::decoration(&head, reversed.get(&oid));
        let line = if oneline {
            render::log_oneline(&oid, &commit, &decoration)
        } else {
            render::log_medium(&oid, &commit, &decoration)
        };

        if !first {
            print!("{separator}");
        }
        println!("{line}");
        first = false;
    }

    Ok(())
}

pub fn merge(source: &str, into: Option<&str>) -> Result<()> {
    let session = Session::open()?;
    let repository = &session.repository;

    let head = repository.refs().head()?;
    let checked_out = match into {
        Some(target) => head.branch().is_some_and(|branch| branch.as_ref() == target),
        None => true,
    };
    let target = match (into, &head) {
        (Some(target), _) => target.to_string(),
        (None, Head::Attached(branch)) => branch.to_string(),
        (None, Head::Detached(_)) => "HEAD".to_string(),
    };

    if checked_out {
        session.ensure_clean_workspace("merge")?;
    }
    let before = repository.index().file_map();
    let outcome = repository.merge(source, into)?;

    if checked_out {
        let migration = Migration::plan(&before, &repository.index().file_map());
        session.apply(&migration)?;
    }

    println!("{}", render::merge_outcome(&outcome, source, &target));
    if matches!(outcome, MergeOutcome::Conflicted { .. }) {
        bail!("merge of {source} into {target} stopped on conflicts");
    }

    Ok(())
}

pub fn merge_base(a: &str, b: &str) -> Result<()> {
    let session = Session::open()?;
    let repository = &session.repository;

    let left = repository.resolve_revision(a)?;
    let right = repository.resolve_revision(b)?;
    println!("{}", repository.merge_base(&left, &right)?);

    Ok(())
}

pub fn clone(source: &str, destination: &str) -> Result<()> {
    let repository = Repository::open(source)
        .with_context(|| format!("'{source}' is not a vsx repository"))?;
    let destination = PathBuf::from(destination);

    eprintln!("Cloning into '{}'...", destination.display());
    let clone = repository.clone_to(&destination)?;

    let files = clone.index().file_map();
    let workspace = Workspace::new(clone.path())?;
    workspace
        .apply_migration(&Migration::plan(&FileMap::new(), &files), clone.database())
        .context("failed to populate the working directory")?;

    Ok(())
}

pub fn hash_object(file: &str, write: bool) -> Result<()> {
    let content = std::fs::read(file)
        .map(Bytes::from)
        .with_context(|| format!("cannot read {file}"))?;

    let oid = if write {
        Session::open()?.repository.hash_object(content)?
    } else {
        blob_id(content)?
    };
    println!("{oid}");

    Ok(())
}

pub fn cat_file(object: &str, show_type: bool, show_size: bool) -> Result<()> {
    let session = Session::open()?;
    let info = session.repository.cat_file(object)?;

    if show_type {
        println!("{}", info.object_type);
    } else if show_size {
        println!("{}", info.size());
    } else if info.object_type == ObjectType::Blob {
        print!("{}", info.pretty()?);
    } else {
        println!("{}", info.pretty()?);
    }

    Ok(())
}

pub fn ls_tree(object: &str, recursive: bool) -> Result<()> {
    let session = Session::open()?;

    for listing in session.repository.ls_tree(object, recursive)? {
        println!("{listing}");
    }

    Ok(())
}

pub fn write_commit(tree: &str, parents: &[String], message: &str) -> Result<()> {
    let session = Session::open()?;
    let parents = parents.iter().map(String::as_str).collect::<Vec<_>>();

    let oid = session.repository.write_commit(tree, &parents, message)?;
    println!("{oid}");

    Ok(())
}
