use crate::common::command::{repository_dir, run_vsx_command};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn show_log_with_no_commits(repository_dir: TempDir) {
    run_vsx_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_vsx_command(repository_dir.path(), &["log"])
        .assert()
        .success()
        .stdout("");
}
