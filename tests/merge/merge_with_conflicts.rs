use crate::common::command::{
    commit_all, get_head_commit_sha, get_parent_commit_ids, repository_dir, run_vsx_command,
    stdout_of,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn merge_with_conflicts(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_vsx_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("a.txt"), "one\ntwo\nthree\n".to_string()));
    commit_all(dir, "Base");
    run_vsx_command(dir, &["branch", "feature"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.join("a.txt"), "one\nTWO\nthree\n".to_string()));
    commit_all(dir, "Uppercase");
    let main_head = get_head_commit_sha(dir)?;

    run_vsx_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("a.txt"), "one\n2\nthree\n".to_string()));
    commit_all(dir, "Digits");
    let feature_head = get_head_commit_sha(dir)?;

    run_vsx_command(dir, &["checkout", "main"])
        .assert()
        .success();

    run_vsx_command(dir, &["merge", "feature"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "CONFLICT (content): Merge conflict in a.txt",
        ))
        .stderr(predicate::str::contains(
            "merge of feature into main stopped on conflicts",
        ));

    assert_eq!(
        read_file(&dir.join("a.txt")),
        "one\n<<<<<<< main\nTWO\n=======\n2\n>>>>>>> feature\nthree\n"
    );
    assert_eq!(get_head_commit_sha(dir)?, main_head);

    run_vsx_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You have unmerged paths"))
        .stdout(predicate::str::contains("a.txt"));

    run_vsx_command(dir, &["commit", "-m", "Too early"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unresolved merge conflicts"));

    write_file(FileSpec::new(dir.join("a.txt"), "one\nTwo\nthree\n".to_string()));
    run_vsx_command(dir, &["add", "a.txt"]).assert().success();
    run_vsx_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All conflicts fixed"));
    run_vsx_command(dir, &["commit", "-m", "Resolve"])
        .assert()
        .success();

    let merge_commit = get_head_commit_sha(dir)?;
    assert_eq!(
        get_parent_commit_ids(dir, &merge_commit),
        vec![main_head, feature_head]
    );
    assert_eq!(stdout_of(&mut run_vsx_command(dir, &["status", "--porcelain"])), "");

    Ok(())
}
