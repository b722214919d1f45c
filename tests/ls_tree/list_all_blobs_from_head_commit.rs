use crate::common::command::{init_repository_dir, run_vsx_command, stdout_of};
use assert_fs::TempDir;
use predicates::Predicate;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn list_all_blobs_from_head_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    let expected = "100644 blob 43dd47ea691c90a5fa7827892c70241913351963\t1.txt\n\
                    100644 blob 64c5e5885a4b06010b3a0c20edb7900dd0311025\ta/2.txt\n\
                    100644 blob 1d19714ffbc272ba0da6eb419d66123c20527174\ta/b/3.txt\n";

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["ls-tree", "-r", "HEAD"])),
        expected
    );
}

#[rstest]
fn list_top_level_entries_of_head_tree(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();

    let output = stdout_of(&mut run_vsx_command(dir, &["ls-tree", "main"]));
    let lines = output.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "100644 blob 43dd47ea691c90a5fa7827892c70241913351963\t1.txt"
    );
    assert!(predicate::str::is_match(r"^040000 tree [0-9a-f]{40}\ta$")?.eval(lines[1]));

    Ok(())
}

#[rstest]
fn listing_a_blob_fails(init_repository_dir: TempDir) {
    run_vsx_command(
        init_repository_dir.path(),
        &["ls-tree", "43dd47ea691c90a5fa7827892c70241913351963"],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("expected a tree"));
}
