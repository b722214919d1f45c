use crate::common::command::{
    commit_all, get_head_commit_sha, init_repository_dir, run_vsx_command, stdout_of,
};
use crate::common::file::{FileSpec, delete_path, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn show_full_patch_between_commits(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    let old_commit_sha = get_head_commit_sha(dir)?;

    write_file(FileSpec::new(
        dir.join("1.txt"),
        "one modified\nwith new line\n".to_string(),
    ));
    delete_path(&dir.join("a").join("2.txt"));
    write_file(FileSpec::new(
        dir.join("a/b/3.txt"),
        "three modified".to_string(),
    ));
    write_file(FileSpec::new(dir.join("4.txt"), "four\nnew file\n".to_string()));
    commit_all(dir, "Second commit with multiple changes");

    let new_commit_sha = get_head_commit_sha(dir)?;
    let actual_output = stdout_of(&mut run_vsx_command(
        dir,
        &["diff", &old_commit_sha, &new_commit_sha],
    ));

    assert!(actual_output.contains("diff --git a/1.txt b/1.txt"));
    assert!(actual_output.contains("--- a/1.txt"));
    assert!(actual_output.contains("+++ b/1.txt"));
    assert!(actual_output.contains(
        "@@ -1,1 +1,2 @@\n-one\n\\ No newline at end of file\n+one modified\n+with new line\n"
    ));

    assert!(actual_output.contains("diff --git a/4.txt b/4.txt\nnew file mode 100644"));
    assert!(actual_output.contains("--- /dev/null\n+++ b/4.txt"));
    assert!(actual_output.contains("@@ -0,0 +1,2 @@\n+four\n+new file"));

    assert!(actual_output.contains("diff --git a/a/2.txt b/a/2.txt\ndeleted file mode 100644"));
    assert!(actual_output.contains("--- a/a/2.txt\n+++ /dev/null"));
    assert!(actual_output.contains("-two"));

    assert!(actual_output.contains("diff --git a/a/b/3.txt b/a/b/3.txt"));
    assert!(actual_output.contains(
        "-three\n\\ No newline at end of file\n+three modified\n\\ No newline at end of file"
    ));

    // one revision is compared with HEAD
    let against_head = stdout_of(&mut run_vsx_command(dir, &["diff", &old_commit_sha]));
    assert_eq!(against_head, actual_output);

    Ok(())
}
