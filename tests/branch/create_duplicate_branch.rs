use crate::common::command::{init_repository_dir, run_vsx_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn create_duplicate_branch(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_vsx_command(dir, &["branch", "feature"])
        .assert()
        .success();
    run_vsx_command(dir, &["branch", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("branch feature already exists"));
}
