mod list_all_blobs_from_head_commit;
