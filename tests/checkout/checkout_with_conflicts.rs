use crate::common::command::{commit_all, init_repository_dir, run_vsx_command};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn checkout_with_conflicts(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_vsx_command(dir, &["branch", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("1.txt"), "one on main".to_string()));
    commit_all(dir, "Second commit");

    // unstaged edit
    write_file(FileSpec::new(dir.join("1.txt"), "local edit".to_string()));
    run_vsx_command(dir, &["checkout", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("would be overwritten by checkout"))
        .stderr(predicate::str::contains("1.txt"));

    // staged edit
    run_vsx_command(dir, &["add", "1.txt"]).assert().success();
    run_vsx_command(dir, &["checkout", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staged changes would be discarded"));
    assert_eq!(read_file(&dir.join("1.txt")), "local edit");

    run_vsx_command(dir, &["checkout", "--force", "feature"])
        .assert()
        .success();
    assert_eq!(read_file(&dir.join("1.txt")), "one");
}
