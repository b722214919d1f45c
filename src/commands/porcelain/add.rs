use crate::areas::repository::Repository;
use crate::areas::workspace::ContentsProvider;
use crate::artifacts::merge::merge_state::MergeState;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::path::PathBuf;

impl Repository {
    /// Store the current contents of `paths` as blobs and stage them
    ///
    /// Paths are relative to the working directory root. The index is persisted
    /// once every blob is stored, so a failing provider leaves it untouched.
    /// During a pending merge, staging a conflicted path marks it resolved.
    pub fn stage_files(
        &self,
        paths: &[PathBuf],
        provider: &impl ContentsProvider,
    ) -> Result<Vec<ObjectId>> {
        let mut index = self.reload_index()?;
        let mut staged = Vec::with_capacity(paths.len());

        for path in paths {
            let blob = Blob::new(provider.contents(path)?);
            let oid = self.database().store(&blob)?;
            index.stage(path, oid.clone())?;
            tracing::debug!(path = %path.display(), %oid, "staged");
            staged.push(oid);
        }

        index.write_updates()?;
        drop(index);

        self.mark_merge_resolved(paths)?;
        Ok(staged)
    }

    /// Drop `paths` (and anything staged below them) from the index
    ///
    /// Like staging, this settles any conflict of a pending merge under `paths`.
    pub fn unstage(&self, paths: &[PathBuf]) -> Result<()> {
        let mut index = self.reload_index()?;

        for path in paths {
            index.unstage(path);
            tracing::debug!(path = %path.display(), "unstaged");
        }

        index.write_updates()?;
        drop(index);

        self.mark_merge_resolved(paths)
    }

    fn mark_merge_resolved(&self, paths: &[PathBuf]) -> Result<()> {
        let Some(mut state) = self.pending_merge()? else {
            return Ok(());
        };

        if state.mark_resolved(paths) {
            tracing::debug!(unresolved = state.unresolved().len(), "conflicts resolved");
            state.save(&self.merge_state_path())?;
        }
        Ok(())
    }
}
