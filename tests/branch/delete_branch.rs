use crate::common::command::{init_repository_dir, run_vsx_command, stdout_of};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn delete_branch(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_vsx_command(dir, &["branch", "feature"])
        .assert()
        .success();

    run_vsx_command(dir, &["branch", "-d", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Deleted branch feature (was "));

    assert_eq!(stdout_of(&mut run_vsx_command(dir, &["branch"])), "* main\n");
}

#[rstest]
fn deleting_the_checked_out_branch_fails(init_repository_dir: TempDir) {
    run_vsx_command(init_repository_dir.path(), &["branch", "-d", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("checked out"));
}

#[rstest]
fn deleting_an_unknown_branch_fails(init_repository_dir: TempDir) {
    run_vsx_command(init_repository_dir.path(), &["branch", "-d", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown reference 'nowhere'"));
}
