use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::collections::{HashSet, VecDeque};

/// Breadth-first walk over the ancestors of a commit
///
/// Each ancestor is yielded exactly once; the starting commit is not yielded. A load
/// failure is yielded once and ends the walk.
pub struct Ancestors<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
    start: ObjectId,
    queue: VecDeque<ObjectId>,
    visited: HashSet<ObjectId>,
}

impl<CommitLoaderFn> Ancestors<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn, start: ObjectId) -> Self {
        Ancestors {
            commit_loader,
            queue: VecDeque::from([start.clone()]),
            visited: HashSet::from([start.clone()]),
            start,
        }
    }
}

impl<CommitLoaderFn> Iterator for Ancestors<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Result<SlimCommit>,
{
    type Item = Result<ObjectId>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(oid) = self.queue.pop_front() {
            let commit = match (self.commit_loader)(&oid) {
                Ok(commit) => commit,
                Err(e) => {
                    self.queue.clear();
                    return Some(Err(e));
                }
            };

            for parent in commit.parents {
                if self.visited.insert(parent.clone()) {
                    self.queue.push_back(parent);
                }
            }

            tracing::trace!(commit = %oid, "walked");

            if oid != self.start {
                return Some(Ok(oid));
            }
        }

        None
    }
}
