use crate::common::command::{init_repository_dir, run_vsx_command, stdout_of};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn numbered_lines(count: usize) -> String {
    (1..=count).map(|i| format!("line {i}\n")).collect()
}

#[rstest]
fn show_diff_with_hunks_for_modified_file_in_workspace(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("long.txt"), numbered_lines(20)));
    run_vsx_command(dir, &["add", "long.txt"]).assert().success();
    let old_blob = stdout_of(&mut run_vsx_command(dir, &["hash-object", "long.txt"]));

    let edited = numbered_lines(20)
        .replace("line 2\n", "line two\n")
        .replace("line 18\n", "");
    write_file(FileSpec::new(dir.join("long.txt"), edited));
    let new_blob = stdout_of(&mut run_vsx_command(dir, &["hash-object", "long.txt"]));

    let expected = format!(
        "diff --git a/long.txt b/long.txt\n\
         index {}..{} 100644\n\
         --- a/long.txt\n\
         +++ b/long.txt\n\
         @@ -1,5 +1,5 @@\n \
         line 1\n\
         -line 2\n\
         +line two\n \
         line 3\n \
         line 4\n \
         line 5\n\
         @@ -15,6 +15,5 @@\n \
         line 15\n \
         line 16\n \
         line 17\n\
         -line 18\n \
         line 19\n \
         line 20\n",
        &old_blob[..7],
        &new_blob[..7]
    );

    assert_eq!(stdout_of(&mut run_vsx_command(dir, &["diff"])), expected);
}
