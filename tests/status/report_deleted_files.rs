use crate::common::command::{init_repository_dir, run_vsx_command, stdout_of};
use crate::common::file::delete_path;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn report_deleted_files(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    delete_path(&dir.join("a"));

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["status", "--porcelain"])),
        " D a/2.txt\n D a/b/3.txt\n"
    );
}
