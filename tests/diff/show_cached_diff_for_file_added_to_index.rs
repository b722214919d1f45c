use crate::common::command::{init_repository_dir, run_vsx_command, stdout_of};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn show_cached_diff_for_file_added_to_index(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("4.txt"), "four\n".to_string()));
    run_vsx_command(dir, &["add", "4.txt"]).assert().success();

    let blob = stdout_of(&mut run_vsx_command(dir, &["hash-object", "4.txt"]));
    let expected = format!(
        "diff --git a/4.txt b/4.txt\n\
         new file mode 100644\n\
         index 0000000..{}\n\
         --- /dev/null\n\
         +++ b/4.txt\n\
         @@ -0,0 +1,1 @@\n\
         +four\n",
        &blob[..7]
    );

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["diff", "--cached"])),
        expected
    );
    // nothing unstaged
    assert_eq!(stdout_of(&mut run_vsx_command(dir, &["diff"])), "");
}
