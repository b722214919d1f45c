use crate::common::command::{init_repository_dir, run_vsx_command, stdout_of};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn report_staged_and_unstaged_changes(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "staged".to_string()));
    run_vsx_command(dir, &["add", "1.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("1.txt"), "unstaged".to_string()));
    write_file(FileSpec::new(dir.join("new.txt"), "new".to_string()));

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["status", "--porcelain"])),
        "MM 1.txt\n?? new.txt\n"
    );

    let long = stdout_of(&mut run_vsx_command(dir, &["status"]));
    assert_eq!(
        long,
        "On branch main\n\
         \n\
         Changes to be committed:\n\
         \x20       modified:   1.txt\n\
         \n\
         Changes not staged for commit:\n\
         \x20       modified:   1.txt\n\
         \n\
         Untracked files:\n\
         \x20       new.txt\n"
    );
}
