use crate::common::command::{
    get_head_commit_sha, repository_with_multiple_commits, run_vsx_command, stdout_of,
};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("main")]
#[case("HEAD")]
#[case("HEAD~2")]
fn merge_same_commit(
    repository_with_multiple_commits: TempDir,
    #[case] source: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_multiple_commits.path();
    let head = get_head_commit_sha(dir)?;

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["merge", source])),
        "Already up to date.\n"
    );
    assert_eq!(get_head_commit_sha(dir)?, head);

    Ok(())
}
