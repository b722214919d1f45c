use crate::common::command::{repository_with_multiple_commits, run_vsx_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
#[case("nonexistent", "unknown reference 'nonexistent'")]
#[case("HEAD~5", "unknown reference")]
#[case("bad..name", "invalid branch name")]
fn show_log_from_invalid_revision(
    repository_with_multiple_commits: TempDir,
    #[case] revision: &str,
    #[case] message: &str,
) {
    run_vsx_command(repository_with_multiple_commits.path(), &["log", revision])
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));
}
