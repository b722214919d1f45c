mod create_branch_with_invalid_name;
mod create_branch_without_commits;
mod create_duplicate_branch;
mod delete_branch;
