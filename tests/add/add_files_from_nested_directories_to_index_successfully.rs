use crate::common::command::{repository_dir, run_vsx_command, stdout_of};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn add_files_from_nested_directories_to_index_successfully(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_vsx_command(dir, &["init"]).assert().success();

    for (path, content) in [("1.txt", "one"), ("a/2.txt", "two"), ("a/b/3.txt", "three")] {
        write_file(FileSpec::new(dir.join(path), content.to_string()));
    }

    run_vsx_command(dir, &["add", "a"]).assert().success();
    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["status", "--porcelain"])),
        "A  a/2.txt\nA  a/b/3.txt\n?? 1.txt\n"
    );

    run_vsx_command(dir, &["add", "."]).assert().success();
    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["status", "--porcelain"])),
        "A  1.txt\nA  a/2.txt\nA  a/b/3.txt\n"
    );
}
