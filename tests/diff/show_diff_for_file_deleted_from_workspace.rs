use crate::common::command::{init_repository_dir, run_vsx_command, stdout_of};
use crate::common::file::delete_path;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn show_diff_for_file_deleted_from_workspace(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    delete_path(&dir.join("1.txt"));

    let output = stdout_of(&mut run_vsx_command(dir, &["diff"]));
    assert!(output.starts_with("diff --git a/1.txt b/1.txt\ndeleted file mode 100644\n"));
    assert!(output.ends_with("--- a/1.txt\n+++ /dev/null\n@@ -1,1 +0,0 @@\n-one\n\\ No newline at end of file\n"));

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["diff", "--name-status"])),
        "D\t1.txt\n"
    );
    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["diff", "--cached"])),
        ""
    );
}
