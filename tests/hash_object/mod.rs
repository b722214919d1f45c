mod write_blob_object_successfully;
