use crate::common::command::{commit_all, repository_dir, run_vsx_command, stdout_of};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn clone_repository_with_two_branches(repository_dir: TempDir) {
    let dir = repository_dir.path().join("origin");
    std::fs::create_dir_all(&dir).unwrap();
    run_vsx_command(&dir, &["init"]).assert().success();

    for i in 1..=3 {
        write_file(FileSpec::new(dir.join(format!("main-{i}.txt")), format!("main {i}")));
        commit_all(&dir, &format!("Main commit {i}"));
    }
    run_vsx_command(&dir, &["branch", "feature", "HEAD^"])
        .assert()
        .success();
    run_vsx_command(&dir, &["checkout", "feature"])
        .assert()
        .success();
    for i in 1..=2 {
        write_file(FileSpec::new(
            dir.join(format!("feature/{i}.txt")),
            format!("feature {i}"),
        ));
        commit_all(&dir, &format!("Feature commit {i}"));
    }

    run_vsx_command(repository_dir.path(), &["clone", "origin", "copy"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Cloning into 'copy'..."));
    let copy = repository_dir.path().join("copy");

    for revision in ["main", "feature"] {
        assert_eq!(
            stdout_of(&mut run_vsx_command(&copy, &["log", "--oneline", revision])),
            stdout_of(&mut run_vsx_command(&dir, &["log", "--oneline", revision])),
        );
    }
    assert_eq!(
        stdout_of(&mut run_vsx_command(&copy, &["branch"])),
        "* feature\n  main\n"
    );
    assert_eq!(read_file(&copy.join("feature/2.txt")), "feature 2");
    assert_eq!(read_file(&copy.join("main-2.txt")), "main 2");
    assert!(!copy.join("main-3.txt").exists());
    assert_eq!(stdout_of(&mut run_vsx_command(&copy, &["status", "--porcelain"])), "");
}

#[rstest]
fn cloning_into_an_existing_repository_fails(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_vsx_command(dir, &["init", "origin"]).assert().success();
    run_vsx_command(dir, &["init", "copy"]).assert().success();

    run_vsx_command(dir, &["clone", "origin", "copy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[rstest]
fn cloning_a_plain_directory_fails(repository_dir: TempDir) {
    run_vsx_command(repository_dir.path(), &["clone", ".", "copy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a vsx repository"));
}
