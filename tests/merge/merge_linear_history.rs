use crate::common::command::{
    commit_all, get_head_commit_sha, repository_with_multiple_commits, run_vsx_command,
    stdout_of,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn merge_linear_history(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_multiple_commits.path();
    run_vsx_command(dir, &["branch", "feature"])
        .assert()
        .success();
    run_vsx_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("file4.txt"), "Content 4".to_string()));
    commit_all(dir, "Fourth commit");
    let feature_head = get_head_commit_sha(dir)?;

    run_vsx_command(dir, &["checkout", "main"])
        .assert()
        .success();
    assert!(!dir.join("file4.txt").exists());

    let output = stdout_of(&mut run_vsx_command(dir, &["merge", "feature"]));

    assert_eq!(output, format!("Fast-forward main to {}\n", &feature_head[..7]));
    assert_eq!(get_head_commit_sha(dir)?, feature_head);
    assert_eq!(read_file(&dir.join("file4.txt")), "Content 4");
    assert_eq!(stdout_of(&mut run_vsx_command(dir, &["status", "--porcelain"])), "");

    Ok(())
}
