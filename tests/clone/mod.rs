mod clone_repository_with_two_branches;
