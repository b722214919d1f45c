use crate::common::command::{
    commit_all, get_head_commit_sha, get_parent_commit_ids, repository_with_multiple_commits,
    run_vsx_command, stdout_of,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn merge_simple_divergence(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_with_multiple_commits.path();
    let base = get_head_commit_sha(dir)?;
    run_vsx_command(dir, &["branch", "feature"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.join("main.txt"), "from main".to_string()));
    commit_all(dir, "Main commit");
    let main_head = get_head_commit_sha(dir)?;

    run_vsx_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("feature.txt"), "from feature".to_string()));
    commit_all(dir, "Feature commit");
    let feature_head = get_head_commit_sha(dir)?;

    run_vsx_command(dir, &["checkout", "main"])
        .assert()
        .success();

    assert_eq!(
        stdout_of(&mut run_vsx_command(dir, &["merge-base", "main", "feature"])),
        format!("{base}\n")
    );

    let output = stdout_of(&mut run_vsx_command(dir, &["merge", "feature"]));
    let merge_commit = get_head_commit_sha(dir)?;

    assert_eq!(
        output,
        format!(
            "Merged feature into main as {}\nMerge made by the 'three-way' strategy.\n",
            &merge_commit[..7]
        )
    );
    assert_eq!(
        get_parent_commit_ids(dir, &merge_commit),
        vec![main_head, feature_head]
    );
    assert_eq!(read_file(&dir.join("main.txt")), "from main");
    assert_eq!(read_file(&dir.join("feature.txt")), "from feature");

    let subject = stdout_of(&mut run_vsx_command(dir, &["log", "--oneline"]));
    assert!(
        subject
            .lines()
            .next()
            .is_some_and(|line| line.ends_with("Merge feature into main"))
    );
    assert_eq!(stdout_of(&mut run_vsx_command(dir, &["status", "--porcelain"])), "");

    Ok(())
}
