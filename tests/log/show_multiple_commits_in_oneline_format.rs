use crate::common::command::{
    get_head_commit_sha, repository_with_multiple_commits, run_vsx_command, stdout_of,
};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn show_multiple_commits_in_oneline_format(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_multiple_commits.path();
    let head = get_head_commit_sha(dir)?;

    let output = stdout_of(&mut run_vsx_command(dir, &["log", "--oneline"]));
    let lines = output.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], format!("{} (HEAD -> main) Third commit", &head[..7]));
    assert!(lines[1].ends_with(" Second commit"));
    assert!(lines[2].ends_with(" First commit"));

    Ok(())
}
