use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

const LOG_ENV_VAR: &str = "VSX_LOG";

#[derive(Parser)]
#[command(
    name = "vsx",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small content-addressed version control system",
    long_about = "vsx keeps snapshots of a directory as content-addressed blobs, trees and commits, \
    with branches, tags, diffs and three-way merges on top. \
    Set VSX_LOG (e.g. VSX_LOG=debug) to see what the engine is doing.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command stores the current content of the given files as blobs and stages them. \
        Directories are staged recursively; tracked files missing from the working directory are unstaged."
    )]
    Add {
        #[arg(index = 1, required = true, help = "Files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "rm",
        about = "Remove files from the index",
        long_about = "This command unstages the given files. Unless --cached is given, \
        the files are also deleted from the working directory."
    )]
    Rm {
        #[arg(long, help = "Only remove the files from the index")]
        cached: bool,
        #[arg(index = 1, required = true, help = "Tracked files or directories")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command snapshots the index into a commit on top of HEAD. \
        The author comes from VSX_AUTHOR_NAME/VSX_AUTHOR_EMAIL or the [user] section of the config."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "status",
        about = "Show staged, unstaged and untracked changes",
        long_about = "This command compares the index with HEAD and the working directory with the index."
    )]
    Status {
        #[arg(long, help = "Machine-readable two-column output")]
        porcelain: bool,
    },
    #[command(
        name = "branch",
        about = "List, create or delete branches",
        long_about = "Without arguments this command lists local branches. \
        With a name it creates a branch at the start revision (HEAD by default); with -d it deletes one."
    )]
    Branch {
        #[arg(index = 1, help = "The branch name")]
        name: Option<String>,
        #[arg(index = 2, help = "The revision the new branch points at")]
        start: Option<String>,
        #[arg(short, long, help = "Delete the branch")]
        delete: bool,
    },
    #[command(
        name = "tag",
        about = "List or create tags",
        long_about = "Without arguments this command lists tags. \
        With a name it creates a tag at the start revision (HEAD by default)."
    )]
    Tag {
        #[arg(index = 1, help = "The tag name")]
        name: Option<String>,
        #[arg(index = 2, help = "The revision the tag points at")]
        start: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or move HEAD to a revision",
        long_about = "This command switches to a branch, or detaches HEAD at any other revision, \
        and updates the index and working directory to match."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch or revision to check out")]
        target: String,
        #[arg(short, long, help = "Discard staged and local changes")]
        force: bool,
    },
    #[command(
        name = "diff",
        about = "Show changes between commits, the index and the working directory",
        long_about = "With no revisions this command shows unstaged changes; with --cached, staged changes. \
        One revision is compared with HEAD, two revisions with each other."
    )]
    Diff {
        #[arg(index = 1, num_args = 0..=2, help = "Revisions to compare")]
        revisions: Vec<String>,
        #[arg(long, help = "Compare the index with HEAD or the given revision")]
        cached: bool,
        #[arg(long, help = "Only list changed paths with their status letter")]
        name_status: bool,
        #[arg(long, help = "Only show added (A), deleted (D) or modified (M) files")]
        diff_filter: Option<String>,
    },
    #[command(
        name = "log",
        about = "Show commit history",
        long_about = "This command lists commits reachable from the given revisions (HEAD by default), newest first."
    )]
    Log {
        #[arg(index = 1, help = "Revisions to start from")]
        revisions: Vec<String>,
        #[arg(long, help = "One line per commit")]
        oneline: bool,
    },
    #[command(
        name = "merge",
        about = "Merge a revision into a branch",
        long_about = "This command merges the source revision into the checked-out branch, \
        or into the branch given with --into. Conflicts are staged with markers and must be \
        resolved and committed."
    )]
    Merge {
        #[arg(index = 1, help = "The revision to merge")]
        source: String,
        #[arg(long, help = "The branch receiving the merge")]
        into: Option<String>,
    },
    #[command(
        name = "merge-base",
        about = "Find the best common ancestor of two commits"
    )]
    MergeBase {
        #[arg(index = 1)]
        first: String,
        #[arg(index = 2)]
        second: String,
    },
    #[command(
        name = "clone",
        about = "Copy a repository into a new directory",
        long_about = "This command copies every reachable object, reference and HEAD into a new repository \
        and checks out its working directory."
    )]
    Clone {
        #[arg(index = 1, help = "The repository to copy")]
        source: String,
        #[arg(index = 2, help = "The directory to create")]
        destination: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes an object file and can write it to the object database. \
        It requires the path to the file to be specified."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content, type or size of an object, \
        named by revision, full id or unambiguous id prefix."
    )]
    CatFile {
        #[arg(short = 'p', help = "Pretty-print the object content")]
        pretty: bool,
        #[arg(short = 't', help = "Print the object type", conflicts_with = "pretty")]
        show_type: bool,
        #[arg(short = 's', help = "Print the object size", conflicts_with_all = ["pretty", "show_type"])]
        show_size: bool,
        #[arg(index = 1)]
        object: String,
    },
    #[command(
        name = "ls-tree",
        about = "List the contents of a tree object",
        long_about = "This command lists the entries of a tree, or of a commit's tree."
    )]
    LsTree {
        #[arg(short, long, help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(index = 1)]
        object: String,
    },
    #[command(
        name = "write-commit",
        about = "Create a commit object from a tree",
        long_about = "This command writes a commit for the given tree and parents without moving any reference."
    )]
    WriteCommit {
        #[arg(index = 1, help = "The tree object")]
        tree: String,
        #[arg(short, long = "parent", help = "A parent commit, repeatable")]
        parents: Vec<String>,
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => cli::init(path),
        Commands::Add { paths } => cli::add(&paths),
        Commands::Rm { cached, paths } => cli::rm(&paths, cached),
        Commands::Commit { message } => cli::commit(&message),
        Commands::Status { porcelain } => cli::status(porcelain),
        Commands::Branch {
            name,
            start,
            delete,
        } => cli::branch(name, start, delete),
        Commands::Tag { name, start } => cli::tag(name, start),
        Commands::Checkout { target, force } => cli::checkout(&target, force),
        Commands::Diff {
            revisions,
            cached,
            name_status,
            diff_filter,
        } => cli::diff(cli::DiffOptions {
            revisions,
            cached,
            name_status,
            filter: diff_filter,
        }),
        Commands::Log { revisions, oneline } => cli::log(&revisions, oneline),
        Commands::Merge { source, into } => cli::merge(&source, into.as_deref()),
        Commands::MergeBase { first, second } => cli::merge_base(&first, &second),
        Commands::Clone {
            source,
            destination,
        } => cli::clone(&source, &destination),
        Commands::HashObject { write, file } => cli::hash_object(&file, write),
        Commands::CatFile {
            pretty: _,
            show_type,
            show_size,
            object,
        } => cli::cat_file(&object, show_type, show_size),
        Commands::LsTree { recursive, object } => cli::ls_tree(&object, recursive),
        Commands::WriteCommit {
            tree,
            parents,
            message,
        } => cli::write_commit(&tree, &parents, &message),
    }
}
