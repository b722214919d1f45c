use crate::common::command::{repository_dir, run_vsx_command, stdout_of};
use crate::common::file::write_generated_files;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn list_untracked_files_in_name_order(repository_dir: TempDir) {
    run_vsx_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let files = write_generated_files(repository_dir.path(), 3);
    let expected_output = files
        .iter()
        .map(|f| format!("?? {}\n", f.path.file_name().unwrap().to_string_lossy()))
        .collect::<String>();

    assert_eq!(
        stdout_of(&mut run_vsx_command(
            repository_dir.path(),
            &["status", "--porcelain"]
        )),
        expected_output
    );
}
