use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use derive_new::new;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_DATE: &str = "2024-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository with `1.txt`, `a/2.txt` and `a/b/3.txt` committed on `main`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_vsx_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    for (path, content) in [("1.txt", "one"), ("a/2.txt", "two"), ("a/b/3.txt", "three")] {
        write_file(FileSpec::new(
            repository_dir.path().join(path),
            content.to_string(),
        ));
    }

    run_vsx_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();
    vsx_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

#[derive(Debug, Clone, new)]
pub struct RandomAuthor {
    pub name: String,
    pub email: String,
}

pub fn generate_random_author() -> RandomAuthor {
    use fake::Fake;
    use fake::faker::internet::en::FreeEmail;
    use fake::faker::name::en::Name;

    RandomAuthor::new(Name().fake::<String>(), FreeEmail().fake::<String>())
}

pub fn run_vsx_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("vsx").expect("Failed to find vsx binary");
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("VSX_LOG")
        .envs([
            ("VSX_AUTHOR_NAME", "fake_user"),
            ("VSX_AUTHOR_EMAIL", "fake_email@email.com"),
            ("VSX_AUTHOR_DATE", AUTHOR_DATE),
        ])
        .args(args);
    cmd
}

pub fn vsx_commit(dir: &Path, message: &str) -> Command {
    run_vsx_command(dir, &["commit", "-m", message])
}

/// Stage everything and commit it
pub fn commit_all(dir: &Path, message: &str) {
    run_vsx_command(dir, &["add", "."]).assert().success();
    vsx_commit(dir, message).assert().success();
}

pub fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success();
    String::from_utf8(output.get_output().stdout.clone()).expect("stdout is not UTF-8")
}

/// Commit the current HEAD resolves to, read straight from `.vsx`
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_content = std::fs::read_to_string(dir.join(".vsx").join("HEAD"))?;

    match head_content.trim().strip_prefix("ref: ") {
        Some(ref_path) => {
            let ref_file = dir.join(".vsx").join(ref_path);
            Ok(std::fs::read_to_string(ref_file)?.trim().to_string())
        }
        None => Ok(head_content.trim().to_string()),
    }
}

/// Parent ids of a commit, via `cat-file -p`
pub fn get_parent_commit_ids(dir: &Path, commit_id: &str) -> Vec<String> {
    stdout_of(&mut run_vsx_command(dir, &["cat-file", "-p", commit_id]))
        .lines()
        .filter_map(|line| line.strip_prefix("parent "))
        .map(str::to_string)
        .collect()
}

/// Repository with three linear commits, each adding `fileN.txt`
#[fixture]
pub fn repository_with_multiple_commits(repository_dir: TempDir) -> TempDir {
    run_vsx_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    for (i, message) in ["First commit", "Second commit", "Third commit"]
        .into_iter()
        .enumerate()
    {
        write_file(FileSpec::new(
            repository_dir.path().join(format!("file{}.txt", i + 1)),
            format!("content {}", i + 1),
        ));
        commit_all(repository_dir.path(), message);
    }

    repository_dir
}
