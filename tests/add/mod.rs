mod add_files_from_nested_directories_to_index_successfully;
mod adding_a_non_existent_file_fails;
mod removing_deleted_files_from_index_successfully;
