use crate::common::command::{repository_dir, run_vsx_command};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn init_repository_successfully(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir_absolute_path = repository_dir.path().canonicalize()?.display().to_string();

    run_vsx_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(
            r"^Initialized empty vsx repository in .+\n$",
        )?)
        .stdout(predicate::str::contains(dir_absolute_path));

    repository_dir
        .child(".vsx/objects")
        .assert(predicate::path::is_dir());
    repository_dir
        .child(".vsx/refs/heads")
        .assert(predicate::path::is_dir());
    repository_dir
        .child(".vsx/refs/tags")
        .assert(predicate::path::is_dir());
    repository_dir
        .child(".vsx/HEAD")
        .assert(predicate::str::contains("ref: refs/heads/main"));
    repository_dir
        .child(".vsx/config.toml")
        .assert(predicate::path::is_file());

    Ok(())
}
