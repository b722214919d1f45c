use crate::common::command::{init_repository_dir, run_vsx_command, stdout_of};
use crate::common::file::delete_path;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn removing_deleted_files_from_index_successfully(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    delete_path(&dir.join("a").join("2.txt"));

    run_vsx_command(dir, &["add", "."]).assert().success();

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["status", "--porcelain"])),
        "D  a/2.txt\n"
    );
}
