use crate::common::command::{
    get_head_commit_sha, repository_with_multiple_commits, run_vsx_command, stdout_of,
};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn checkout_detached_revision(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_multiple_commits.path();
    let third = get_head_commit_sha(dir)?;

    run_vsx_command(dir, &["checkout", "HEAD~2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("detached HEAD"));

    let head_file = std::fs::read_to_string(dir.join(".vsx/HEAD"))?;
    assert!(!head_file.starts_with("ref: "));
    assert!(!dir.join("file2.txt").exists());
    assert!(!dir.join("file3.txt").exists());
    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["log", "--oneline"]))
            .lines()
            .count(),
        1
    );
    assert!(
        stdout_of(&mut run_vsx_command(dir, &["status"])).starts_with("HEAD detached at ")
    );

    run_vsx_command(dir, &["checkout", &third])
        .assert()
        .success();
    assert!(dir.join("file3.txt").exists());

    Ok(())
}
