use crate::areas::repository::Repository;
use crate::artifacts::log::ancestors::Ancestors;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;

impl Repository {
    /// History reachable from `rev`, newest first
    pub fn log(&self, rev: &str) -> Result<RevList<'_>> {
        let start = self.resolve_revision(rev)?;
        Ok(RevList::new(self.database(), start))
    }

    /// History reachable from several revisions at once
    pub fn log_many(&self, revs: &[&str]) -> Result<RevList<'_>> {
        let starts = revs
            .iter()
            .map(|rev| self.resolve_revision(rev))
            .collect::<Result<Vec<_>>>()?;
        Ok(RevList::from_many(self.database(), starts))
    }

    /// Lazy breadth-first walk over every ancestor of `oid`, excluding `oid`
    pub fn ancestors(
        &self,
        oid: &ObjectId,
    ) -> Ancestors<impl Fn(&ObjectId) -> Result<SlimCommit> + '_> {
        Ancestors::new(
            move |oid: &ObjectId| self.database().load_slim_commit(oid),
            oid.clone(),
        )
    }

    /// Whether `ancestor` is reachable from `descendant` through parents
    ///
    /// A commit is not its own ancestor.
    pub fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> Result<bool> {
        for oid in self.ancestors(descendant) {
            if oid? == *ancestor {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
