mod merge_base_of_unrelated_commits;
mod merge_into_other_branch;
mod merge_linear_history;
mod merge_same_commit;
mod merge_simple_divergence;
mod merge_with_conflicts;
