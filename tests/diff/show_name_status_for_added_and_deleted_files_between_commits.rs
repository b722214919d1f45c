use crate::common::command::{
    commit_all, get_head_commit_sha, init_repository_dir, run_vsx_command, stdout_of,
};
use crate::common::file::{FileSpec, delete_path, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(None, "M\t1.txt\nA\t4.txt\nD\ta/2.txt\n")]
#[case(Some("AD"), "A\t4.txt\nD\ta/2.txt\n")]
#[case(Some("M"), "M\t1.txt\n")]
fn show_name_status_for_added_and_deleted_files_between_commits(
    init_repository_dir: TempDir,
    #[case] filter: Option<&str>,
    #[case] expected: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let old = get_head_commit_sha(dir)?;

    write_file(FileSpec::new(dir.join("1.txt"), "uno".to_string()));
    write_file(FileSpec::new(dir.join("4.txt"), "four".to_string()));
    delete_path(&dir.join("a/2.txt"));
    commit_all(dir, "Second commit");

    let filter_arg = filter.map(|f| format!("--diff-filter={f}"));
    let mut args = vec!["diff", "--name-status"];
    if let Some(filter_arg) = &filter_arg {
        args.push(filter_arg);
    }
    args.extend([old.as_str(), "HEAD"]);

    assert_eq!(stdout_of(&mut run_vsx_command(dir, &args)), expected);

    Ok(())
}

#[rstest]
fn unknown_diff_filter_is_rejected(init_repository_dir: TempDir) {
    run_vsx_command(
        init_repository_dir.path(),
        &["diff", "--diff-filter=X", "HEAD", "HEAD"],
    )
    .assert()
    .failure();
}
