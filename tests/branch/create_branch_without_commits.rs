use crate::common::command::{repository_dir, run_vsx_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn create_branch_without_commits(repository_dir: TempDir) {
    run_vsx_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_vsx_command(repository_dir.path(), &["branch", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HEAD"));
}
