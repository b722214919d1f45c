use crate::common::command::{repository_dir, run_vsx_command, stdout_of};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use fake::Fake;
use fake::faker::lorem::en::Words;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

const HELLO_OID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

#[rstest]
fn write_blob_object_successfully(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_vsx_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("hello.txt"), "hello\n".to_string()));

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["hash-object", "hello.txt"])),
        format!("{HELLO_OID}\n")
    );
    run_vsx_command(dir, &["cat-file", "-t", HELLO_OID])
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!("object {HELLO_OID} not found")));

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["hash-object", "-w", "hello.txt"])),
        format!("{HELLO_OID}\n")
    );
    assert!(
        dir.join(".vsx/objects")
            .join(&HELLO_OID[..2])
            .join(&HELLO_OID[2..])
            .is_file()
    );

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["cat-file", "-t", HELLO_OID])),
        "blob\n"
    );
    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["cat-file", "-s", &HELLO_OID[..7]])),
        "6\n"
    );
    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["cat-file", "-p", HELLO_OID])),
        "hello\n"
    );
}

#[rstest]
fn hashing_random_content_is_stable(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_vsx_command(dir, &["init"]).assert().success();
    let content = Words(5..10).fake::<Vec<String>>().join(" ");
    write_file(FileSpec::new(dir.join("words.txt"), content));

    let dry_run = stdout_of(&mut run_vsx_command(dir, &["hash-object", "words.txt"]));
    let written = stdout_of(&mut run_vsx_command(dir, &["hash-object", "-w", "words.txt"]));
    let rewritten = stdout_of(&mut run_vsx_command(dir, &["hash-object", "-w", "words.txt"]));

    assert_eq!(dry_run, written);
    assert_eq!(written, rewritten);
}

#[rstest]
fn hashing_a_missing_file_fails(repository_dir: TempDir) {
    run_vsx_command(repository_dir.path(), &["hash-object", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read missing.txt"));
}
