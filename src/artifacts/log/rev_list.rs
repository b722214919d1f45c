use crate::areas::database::Database;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use chrono::{DateTime, FixedOffset};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, VecDeque};

/// History reachable from one or more commits, newest first
///
/// A commit is listed after every descendant of it within the walked history and
/// before any of its ancestors. Among the commits free to go next, the newest wins
/// and equal timestamps fall back to ascending id.
///
/// The list is restartable: every call to [`RevList::iter`] walks again.
#[derive(Debug, Clone)]
pub struct RevList<'r> {
    database: &'r Database,
    starts: Vec<ObjectId>,
}

impl<'r> RevList<'r> {
    pub fn new(database: &'r Database, start: ObjectId) -> Self {
        Self::from_many(database, vec![start])
    }

    pub fn from_many(database: &'r Database, starts: Vec<ObjectId>) -> Self {
        RevList { database, starts }
    }

    pub fn iter(&self) -> RevListIter<'r> {
        RevListIter {
            database: self.database,
            starts: self.starts.clone(),
            state: WalkState::Pending,
        }
    }
}

impl<'r> IntoIterator for &RevList<'r> {
    type Item = Result<(ObjectId, Commit)>;
    type IntoIter = RevListIter<'r>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ReadyCommit {
    timestamp: DateTime<FixedOffset>,
    oid: Reverse<ObjectId>,
}

impl Ord for ReadyCommit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.oid.cmp(&other.oid))
    }
}

impl PartialOrd for ReadyCommit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
enum WalkState {
    Pending,
    Emitting {
        graph: HashMap<ObjectId, SlimCommit>,
        // children not yet emitted, per commit
        pending_children: HashMap<ObjectId, usize>,
        ready: BinaryHeap<ReadyCommit>,
    },
    Done,
}

pub struct RevListIter<'r> {
    database: &'r Database,
    starts: Vec<ObjectId>,
    state: WalkState,
}

impl RevListIter<'_> {
    /// Load the slim graph behind the start commits and seed the ready queue
    fn collect_graph(&self) -> Result<WalkState> {
        let mut graph = HashMap::new();
        let mut queue = self.starts.iter().cloned().collect::<VecDeque<_>>();

        while let Some(oid) = queue.pop_front() {
            if graph.contains_key(&oid) {
                continue;
            }
            let commit = self.database.load_slim_commit(&oid)?;
            queue.extend(commit.parents.iter().cloned());
            graph.insert(oid, commit);
        }

        let mut pending_children = graph
            .keys()
            .map(|oid| (oid.clone(), 0usize))
            .collect::<HashMap<_, _>>();
        for commit in graph.values() {
            for parent in &commit.parents {
                if let Some(count) = pending_children.get_mut(parent) {
                    *count += 1;
                }
            }
        }

        let ready = pending_children
            .iter()
            .filter(|(_, count)| **count == 0)
            .filter_map(|(oid, _)| graph.get(oid))
            .map(|commit| ReadyCommit {
                timestamp: commit.timestamp,
                oid: Reverse(commit.oid.clone()),
            })
            .collect();

        tracing::debug!(commits = graph.len(), "collected history");

        Ok(WalkState::Emitting {
            graph,
            pending_children,
            ready,
        })
    }
}

impl Iterator for RevListIter<'_> {
    type Item = Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        if let WalkState::Pending = self.state {
            match self.collect_graph() {
                Ok(state) => self.state = state,
                Err(e) => {
                    self.state = WalkState::Done;
                    return Some(Err(e));
                }
            }
        }

        let WalkState::Emitting {
            graph,
            pending_children,
            ready,
        } = &mut self.state
        else {
            return None;
        };

        let Some(ReadyCommit {
            oid: Reverse(oid), ..
        }) = ready.pop()
        else {
            self.state = WalkState::Done;
            return None;
        };

        if let Some(commit) = graph.get(&oid) {
            for parent in &commit.parents {
                if let Some(count) = pending_children.get_mut(parent) {
                    *count -= 1;
                    if *count == 0
                        && let Some(parent_commit) = graph.get(parent)
                    {
                        ready.push(ReadyCommit {
                            timestamp: parent_commit.timestamp,
                            oid: Reverse(parent.clone()),
                        });
                    }
                }
            }
        }

        Some(self.database.load_commit(&oid).map(|commit| (oid, commit)))
    }
}
