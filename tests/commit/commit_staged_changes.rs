use crate::common::command::{
    get_head_commit_sha, get_parent_commit_ids, init_repository_dir, repository_dir,
    run_vsx_command, stdout_of, vsx_commit,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn first_commit_is_a_root_commit(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_vsx_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("readme.md"), "hello".to_string()));
    run_vsx_command(dir, &["add", "readme.md"]).assert().success();

    let output = stdout_of(&mut vsx_commit(dir, "Initial commit"));
    let head = get_head_commit_sha(dir)?;

    assert_eq!(output, format!("[main (root-commit) {}] Initial commit\n", &head[..7]));
    assert!(get_parent_commit_ids(dir, &head).is_empty());

    Ok(())
}

#[rstest]
fn next_commit_has_head_as_parent(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let parent = get_head_commit_sha(dir)?;
    write_file(FileSpec::new(dir.join("1.txt"), "uno".to_string()));
    run_vsx_command(dir, &["add", "1.txt"]).assert().success();

    let output = stdout_of(&mut vsx_commit(dir, "Translate"));
    let head = get_head_commit_sha(dir)?;

    assert_eq!(output, format!("[main {}] Translate\n", &head[..7]));
    assert_eq!(get_parent_commit_ids(dir, &head), vec![parent]);

    Ok(())
}

#[rstest]
fn commit_without_changes_fails(init_repository_dir: TempDir) {
    vsx_commit(init_repository_dir.path(), "Again")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));
}

#[rstest]
fn commit_on_empty_index_fails(repository_dir: TempDir) {
    run_vsx_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    vsx_commit(repository_dir.path(), "Empty")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to commit"));
}

#[rstest]
fn commit_without_author_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "uno".to_string()));
    run_vsx_command(dir, &["add", "1.txt"]).assert().success();

    run_vsx_command(dir, &["commit", "-m", "Anonymous"])
        .env_remove("VSX_AUTHOR_NAME")
        .env_remove("VSX_AUTHOR_EMAIL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("author identity unknown"));
}
