use crate::common::command::{init_repository_dir, run_vsx_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
#[case(".hidden")]
#[case("double..dot")]
#[case("ends.lock")]
#[case("trailing/")]
#[case("has space")]
#[case("colon:name")]
#[case("tilde~1x")]
fn create_branch_with_invalid_name(init_repository_dir: TempDir, #[case] name: &str) {
    run_vsx_command(init_repository_dir.path(), &["branch", name])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid branch name"));
}
