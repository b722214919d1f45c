use crate::common::command::{init_repository_dir, run_vsx_command, stdout_of};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn adding_a_non_existent_file_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_vsx_command(dir, &["add", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not match any files"));

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["status", "--porcelain"])),
        ""
    );
}
