use crate::common::command::{
    commit_all, get_head_commit_sha, get_parent_commit_ids, repository_with_multiple_commits,
    run_vsx_command, stdout_of,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn merge_into_branch_that_is_not_checked_out(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_multiple_commits.path();
    run_vsx_command(dir, &["branch", "release", "HEAD^"])
        .assert()
        .success();
    run_vsx_command(dir, &["checkout", "release"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("hotfix.txt"), "fix".to_string()));
    commit_all(dir, "Hotfix");
    let release_head = get_head_commit_sha(dir)?;

    run_vsx_command(dir, &["checkout", "main"])
        .assert()
        .success();
    let main_head = get_head_commit_sha(dir)?;

    run_vsx_command(dir, &["merge", "main", "--into", "release"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged main into release"));

    // HEAD and the working directory stay on main
    assert_eq!(get_head_commit_sha(dir)?, main_head);
    assert!(!dir.join("hotfix.txt").exists());
    assert_eq!(stdout_of(&mut run_vsx_command(dir, &["status", "--porcelain"])), "");

    let merge_commit = stdout_of(&mut run_vsx_command(dir, &["log", "--oneline", "release"]));
    assert!(
        merge_commit
            .lines()
            .next()
            .is_some_and(|line| line.ends_with(" (release) Merge main into release"))
    );
    assert_eq!(
        get_parent_commit_ids(dir, "release"),
        vec![release_head, main_head]
    );

    Ok(())
}
