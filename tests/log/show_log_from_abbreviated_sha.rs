use crate::common::command::{
    get_head_commit_sha, get_parent_commit_ids, repository_with_multiple_commits,
    run_vsx_command, stdout_of,
};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn show_log_from_abbreviated_sha(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_multiple_commits.path();
    let head = get_head_commit_sha(dir)?;
    let second = get_parent_commit_ids(dir, &head).remove(0);

    let output = stdout_of(&mut run_vsx_command(dir, &["log", "--oneline", &second[..8]]));
    let lines = output.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("{} Second commit", &second[..7]));

    Ok(())
}
