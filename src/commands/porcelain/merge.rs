use crate::areas::refs::{HEAD_REF_NAME, Head};
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::merge::bca_finder::BCAFinder;
use crate::artifacts::merge::merge_state::MergeState;
use crate::artifacts::merge::three_way::{MergeLabels, ThreeWayMerge};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};

/// The reference a merge moves
struct MergeTarget {
    /// Full reference name, or `HEAD` when detached
    ref_name: String,
    /// Name shown in messages and conflict markers
    label: String,
    oid: ObjectId,
    /// HEAD points here, so the index follows the merge
    checked_out: bool,
}

impl Repository {
    /// Best common ancestor of two commits
    pub fn merge_base(&self, a: &ObjectId, b: &ObjectId) -> Result<ObjectId> {
        BCAFinder::new(|oid: &ObjectId| self.database().load_slim_commit(oid))
            .find_best_common_ancestor(a, b)?
            .ok_or_else(|| Error::NoCommonAncestor {
                left: a.clone(),
                right: b.clone(),
            })
    }

    /// Merge revision `source` into branch `target` (the checked-out branch when
    /// omitted)
    ///
    /// The target moves through compare-and-swap, so a concurrent update fails
    /// with `ConcurrentUpdate` instead of being overwritten. Conflicts are
    /// returned as data; when the target is checked out they are also staged as
    /// marker files and the merge is left pending for the next commit.
    pub fn merge(&self, source: &str, target: Option<&str>) -> Result<MergeOutcome> {
        let target = self.merge_target(target)?;

        if target.checked_out
            && let Some(state) = self.pending_merge()?
        {
            return Err(Error::MergeConflict {
                paths: state.conflicts.into_iter().map(|c| c.path).collect(),
            });
        }

        let source_oid = self.resolve_revision(source)?;
        if source_oid == target.oid || self.is_ancestor(&source_oid, &target.oid)? {
            tracing::info!(source, target = %target.label, "already up to date");
            return Ok(MergeOutcome::UpToDate);
        }

        if target.checked_out {
            let status = self.status()?;
            if !status.is_clean() {
                return Err(Error::DirtyWorkingState {
                    paths: status.changes().into_keys().collect(),
                });
            }
        }

        let base = self.merge_base(&target.oid, &source_oid)?;

        if base == target.oid {
            self.refs()
                .compare_and_swap(&target.ref_name, Some(&target.oid), &source_oid)?;
            if target.checked_out {
                self.restage_commit(&source_oid)?;
            }

            tracing::info!(source, target = %target.label, commit = %source_oid, "fast-forwarded");
            return Ok(MergeOutcome::FastForward { commit: source_oid });
        }

        let tree_of = |oid: &ObjectId| -> Result<ObjectId> {
            Ok(self.database().load_commit(oid)?.tree_oid().clone())
        };
        let result = ThreeWayMerge::new(
            self.database(),
            MergeLabels::new(target.label.clone(), source),
        )
        .merge_trees(&tree_of(&base)?, &tree_of(&target.oid)?, &tree_of(&source_oid)?)?;

        if !result.is_clean() {
            if target.checked_out {
                MergeState {
                    source: source.to_string(),
                    source_oid,
                    target: target.label.clone(),
                    resolved: Default::default(),
                    conflicts: result.conflicts.clone(),
                }
                .save(&self.merge_state_path())?;
                self.restage_tree(&result.tree)?;
            }

            tracing::info!(
                source,
                target = %target.label,
                conflicts = result.conflicts.len(),
                "merge stopped on conflicts"
            );
            return Ok(MergeOutcome::Conflicted { result });
        }

        let commit = self.create_commit(
            &result.tree,
            vec![target.oid.clone(), source_oid],
            self.config().author()?,
            &format!("Merge {source} into {}", target.label),
        )?;
        self.refs()
            .compare_and_swap(&target.ref_name, Some(&target.oid), &commit)?;
        if target.checked_out {
            self.restage_tree(&result.tree)?;
        }

        tracing::info!(source, target = %target.label, %commit, "merged");
        Ok(MergeOutcome::Merged { commit, result })
    }

    fn merge_target(&self, target: Option<&str>) -> Result<MergeTarget> {
        let head = self.refs().head()?;

        let branch = match (target, &head) {
            (Some(name), _) => BranchName::try_parse(name)?,
            (None, Head::Attached(branch)) => branch.clone(),
            (None, Head::Detached(oid)) => {
                return Ok(MergeTarget {
                    ref_name: HEAD_REF_NAME.to_string(),
                    label: HEAD_REF_NAME.to_string(),
                    oid: oid.clone(),
                    checked_out: true,
                });
            }
        };

        let ref_name = branch.to_ref_name();
        let oid = self
            .refs()
            .get_ref(&ref_name)?
            .ok_or_else(|| Error::UnknownReference(branch.to_string()))?;

        Ok(MergeTarget {
            ref_name,
            label: branch.to_string(),
            oid,
            checked_out: head.branch() == Some(&branch),
        })
    }

    fn restage_commit(&self, commit: &ObjectId) -> Result<()> {
        let tree = self.database().load_commit(commit)?.tree_oid().clone();
        self.restage_tree(&tree)
    }

    fn restage_tree(&self, tree: &ObjectId) -> Result<()> {
        let mut index = self.reload_index()?;
        index.load_from_tree(self.database(), tree)?;
        index.write_updates()
    }
}
