//! Best common ancestor finder
//!
//! Finds the merge base of two commits: the common ancestor that a three-way merge
//! uses as its base.
//!
//! ## Algorithm
//!
//! ### Phase 1: collect common ancestors
//!
//! Breadth-first walk from both commits at once, one level at a time, expanding the
//! source frontier before the target frontier at every level. Each commit is tagged
//! with the side(s) it was reached from. The moment a commit carries both tags it is
//! recorded as a common ancestor, so the resulting list is in discovery order.
//!
//! ### Phase 2: drop redundant ancestors
//!
//! > A best common ancestor of X and Y is any common ancestor of X and Y that is not
//! > an ancestor of any other common ancestor.
//!
//! Every commit reachable from the parents of a common ancestor is redundant. A single
//! walk with a shared visited set marks all of them.
//!
//! ### Phase 3: pick one
//!
//! Several best common ancestors may survive (criss-cross merges). The one discovered
//! first in phase 1 wins, which keeps the choice deterministic for a given graph.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let finder = BCAFinder::new(|oid| database.load_slim_commit(oid));
//! let base = finder.find_best_common_ancestor(&ours, &theirs)?;
//! ```

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use bitflags::bitflags;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
        const STALE = 0b100; // reachable from another common ancestor
        const RESULT = 0b1000; // recorded as a common ancestor
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_SOURCE) {
            flags.push("SOURCE");
        }
        if self.contains(VisitState::VISITED_FROM_TARGET) {
            flags.push("TARGET");
        }
        if self.contains(VisitState::STALE) {
            flags.push("STALE");
        }
        if self.contains(VisitState::RESULT) {
            flags.push("RESULT");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Best common ancestor finder over any commit store
///
/// The loader returns the parents and timestamp of a commit. It is called at most a
/// handful of times per commit, so backing it with a cache pays off on long histories.
pub struct BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// The best common ancestor of two commits, `None` when their histories are disjoint
    ///
    /// ```rust,ignore
    /// // Linear history: A <- B <- C <- D
    /// assert_eq!(finder.find_best_common_ancestor(&b, &d)?, Some(b));
    ///
    /// // Criss-cross:
    /// //     A
    /// //    / \
    /// //   B   C
    /// //   |\ /|
    /// //   | X |
    /// //   |/ \|
    /// //   D   E
    /// // B and C are both best; whichever was reached from both sides first wins.
    /// ```
    pub fn find_best_common_ancestor(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> Result<Option<ObjectId>> {
        if source_commit_id == target_commit_id {
            return Ok(Some(source_commit_id.clone()));
        }

        let (common_ancestors, mut states) =
            self.find_common_ancestors(source_commit_id, target_commit_id)?;
        if common_ancestors.is_empty() {
            tracing::debug!(
                source = %source_commit_id,
                target = %target_commit_id,
                "no common ancestor"
            );
            return Ok(None);
        }

        tracing::debug!(
            candidates = %join_oids(&common_ancestors),
            "found common ancestors"
        );

        self.mark_redundant(&common_ancestors, &mut states)?;

        let best = common_ancestors
            .into_iter()
            .find(|oid| {
                !states
                    .get(oid)
                    .copied()
                    .unwrap_or_default()
                    .contains(VisitState::STALE)
            });

        if let Some(best) = &best {
            tracing::debug!(
                source = %source_commit_id,
                target = %target_commit_id,
                base = %best,
                "selected merge base"
            );
        }

        Ok(best)
    }

    /// Phase 1: interleaved level-by-level walk from both sides
    ///
    /// Returns the common ancestors in the order they were first reached from both
    /// sides, alongside the visit state of every commit touched.
    fn find_common_ancestors(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> Result<(Vec<ObjectId>, HashMap<ObjectId, VisitState>)> {
        let mut states = HashMap::<ObjectId, VisitState>::new();
        let mut common_ancestors = Vec::new();

        states.insert(source_commit_id.clone(), VisitState::VISITED_FROM_SOURCE);
        states.insert(target_commit_id.clone(), VisitState::VISITED_FROM_TARGET);

        let mut source_frontier = vec![source_commit_id.clone()];
        let mut target_frontier = vec![target_commit_id.clone()];

        while !source_frontier.is_empty() || !target_frontier.is_empty() {
            source_frontier = self.expand(
                source_frontier,
                VisitState::VISITED_FROM_SOURCE,
                &mut states,
                &mut common_ancestors,
            )?;
            target_frontier = self.expand(
                target_frontier,
                VisitState::VISITED_FROM_TARGET,
                &mut states,
                &mut common_ancestors,
            )?;
        }

        Ok((common_ancestors, states))
    }

    /// Advance one side's frontier by a single generation
    fn expand(
        &self,
        frontier: Vec<ObjectId>,
        side: VisitState,
        states: &mut HashMap<ObjectId, VisitState>,
        common_ancestors: &mut Vec<ObjectId>,
    ) -> Result<Vec<ObjectId>> {
        let mut next_frontier = Vec::new();

        for commit_id in frontier {
            let commit = (self.commit_loader)(&commit_id)?;

            for parent_id in commit.parents {
                let state = states.entry(parent_id.clone()).or_default();
                if state.contains(side) {
                    continue;
                }
                *state |= side;

                tracing::trace!(commit = %parent_id, state = %*state, "visited");

                if state.contains(VisitState::VISITED_FROM_BOTH)
                    && !state.contains(VisitState::RESULT)
                {
                    *state |= VisitState::RESULT;
                    common_ancestors.push(parent_id.clone());
                }
                next_frontier.push(parent_id);
            }
        }

        Ok(next_frontier)
    }

    /// Phase 2: tag every common ancestor reachable from another one as `STALE`
    fn mark_redundant(
        &self,
        common_ancestors: &[ObjectId],
        states: &mut HashMap<ObjectId, VisitState>,
    ) -> Result<()> {
        let mut visited = HashSet::<ObjectId>::new();

        for candidate in common_ancestors {
            if visited.contains(candidate) {
                // already reached from an earlier candidate, so are its ancestors
                continue;
            }

            let mut queue = VecDeque::from((self.commit_loader)(candidate)?.parents);
            while let Some(commit_id) = queue.pop_front() {
                if !visited.insert(commit_id.clone()) {
                    continue;
                }
                if let Some(state) = states.get_mut(&commit_id)
                    && state.contains(VisitState::RESULT)
                {
                    *state |= VisitState::STALE;
                }
                queue.extend((self.commit_loader)(&commit_id)?.parents);
            }
        }

        Ok(())
    }
}

fn join_oids(oids: &[ObjectId]) -> String {
    oids.iter()
        .map(|oid| oid.as_ref())
        .collect::<Vec<_>>()
        .join(", ")
}
