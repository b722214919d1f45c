use crate::common::command::{init_repository_dir, run_vsx_command, stdout_of};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn report_files_with_modified_contents(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "changed".to_string()));
    write_file(FileSpec::new(dir.join("a/2.txt"), "modified".to_string()));

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["status", "--porcelain"])),
        " M 1.txt\n M a/2.txt\n"
    );
}
