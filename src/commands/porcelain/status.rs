use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::status::status_info::{StatusReport, WorkspaceChanges};
use crate::errors::Result;

impl Repository {
    /// Staged changes relative to HEAD's tree
    pub fn status(&self) -> Result<StatusReport> {
        let head_tree = self.head_tree()?;
        let index = self.reload_index()?;

        index.status(self.database(), head_tree.as_ref())
    }

    /// Working files that differ from what is staged
    pub fn workspace_status(&self, workspace: &Workspace) -> Result<WorkspaceChanges> {
        let staged = self.reload_index()?.file_map();
        workspace.inspect(&staged)
    }
}
