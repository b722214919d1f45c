use crate::common::command::{
    commit_all, get_head_commit_sha, repository_dir, run_vsx_command, stdout_of,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn merge_base_of_unrelated_commits_fails(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_vsx_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("a.txt"), "a".to_string()));
    commit_all(dir, "First root");
    let first_root = get_head_commit_sha(dir)?;

    let tree = stdout_of(&mut run_vsx_command(dir, &["cat-file", "-p", "HEAD"]))
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("tree "))
        .map(str::to_string)
        .ok_or("commit without tree")?;
    let orphan = stdout_of(&mut run_vsx_command(
        dir,
        &["write-commit", &tree, "-m", "Second root"],
    ));

    run_vsx_command(dir, &["merge-base", &first_root, orphan.trim()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no common ancestor"));

    Ok(())
}
