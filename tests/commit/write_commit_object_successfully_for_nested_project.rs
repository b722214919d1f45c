use crate::common::command::{
    get_head_commit_sha, get_parent_commit_ids, init_repository_dir, run_vsx_command, stdout_of,
};
use assert_fs::TempDir;
use fake::Fake;
use fake::faker::lorem::en::Words;
use predicates::Predicate;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn tree_of(dir: &std::path::Path, revision: &str) -> String {
    stdout_of(&mut run_vsx_command(dir, &["cat-file", "-p", revision]))
        .lines()
        .find_map(|line| line.strip_prefix("tree "))
        .map(str::to_string)
        .unwrap_or_default()
}

#[rstest]
fn write_commit_object_successfully_for_nested_project(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let head = get_head_commit_sha(dir)?;
    let tree = tree_of(dir, "HEAD");
    let message = Words(3..6).fake::<Vec<String>>().join(" ");

    let output = stdout_of(&mut run_vsx_command(
        dir,
        &["write-commit", &tree, "-p", "HEAD", "-m", &message],
    ));
    let commit = output.trim();

    assert!(predicate::str::is_match(r"^[0-9a-f]{40}$")?.eval(commit));
    // no reference moves
    assert_eq!(get_head_commit_sha(dir)?, head);

    let pretty = stdout_of(&mut run_vsx_command(dir, &["cat-file", "-p", commit]));
    assert_eq!(tree_of(dir, commit), tree);
    assert_eq!(get_parent_commit_ids(dir, commit), vec![head]);
    assert!(pretty.contains("author fake_user <fake_email@email.com> 1704110400 +0000"));
    assert!(pretty.ends_with(&format!("\n\n{message}\n")));
    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["cat-file", "-t", commit])),
        "commit\n"
    );

    Ok(())
}

#[rstest]
#[case::blob_as_tree(&["write-commit", "43dd47ea691c90a5fa7827892c70241913351963", "-m", "x"], "expected a tree")]
#[case::unknown_parent(&["write-commit", "HEAD", "-p", "nonexistent", "-m", "x"], "unknown reference")]
fn write_commit_with_invalid_input_fails(
    init_repository_dir: TempDir,
    #[case] args: &[&str],
    #[case] message: &str,
) {
    run_vsx_command(init_repository_dir.path(), args)
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));
}
