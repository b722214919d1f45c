use crate::common::command::{
    get_head_commit_sha, get_parent_commit_ids, repository_with_multiple_commits,
    run_vsx_command, stdout_of,
};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn show_linear_history_in_medium_format(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_multiple_commits.path();
    let third = get_head_commit_sha(dir)?;
    let second = get_parent_commit_ids(dir, &third).remove(0);
    let first = get_parent_commit_ids(dir, &second).remove(0);

    let expected = format!(
        "commit {third} (HEAD -> main)\n\
         Author: fake_user <fake_email@email.com>\n\
         Date:   Mon Jan 1 12:00:00 2024 +0000\n\
         \n\
         \x20   Third commit\n\
         \n\
         commit {second}\n\
         Author: fake_user <fake_email@email.com>\n\
         Date:   Mon Jan 1 12:00:00 2024 +0000\n\
         \n\
         \x20   Second commit\n\
         \n\
         commit {first}\n\
         Author: fake_user <fake_email@email.com>\n\
         Date:   Mon Jan 1 12:00:00 2024 +0000\n\
         \n\
         \x20   First commit\n"
    );

    assert_eq!(stdout_of(&mut run_vsx_command(dir, &["log"])), expected);

    Ok(())
}
