use crate::areas::database::Database;
use crate::areas::refs::{HEAD_REF_NAME, Refs};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{ANCESTOR_REGEX, HEAD_ALIAS, PARENT_REGEX};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use std::fmt;

/// Shortest abbreviated id accepted in a revision
pub const MIN_ABBREVIATED_OID_LENGTH: usize = 4;

/// A revision expression naming a commit
///
/// Supported forms:
/// - `HEAD`, or its alias `@`
/// - branch or tag names: `main`, `feature/login`, `v1.0`
/// - full ids and abbreviations of at least 4 hex characters
/// - parent notation: `<revision>^`
/// - ancestor notation: `<revision>~<n>`
///
/// Hex-looking names are parsed as `Ref`; resolution tries branches and tags
/// before treating them as ids, so a branch named `cafe` shadows the id prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    /// HEAD, a branch, a tag, or a possible object id
    Ref(BranchName),
    /// The Nth first-parent ancestor (`HEAD~3`)
    Ancestor(Box<Revision>, usize),
    /// The first parent (`HEAD^`)
    Parent(Box<Revision>),
}

impl Revision {
    pub fn try_parse(revision: &str) -> Result<Revision> {
        let invalid = |_| Error::InvalidBranchName(revision.to_string());
        let parent_regex = regex::Regex::new(PARENT_REGEX).map_err(invalid)?;
        let ancestor_regex = regex::Regex::new(ANCESTOR_REGEX).map_err(invalid)?;

        if let Some(caps) = parent_regex.captures(revision) {
            let base_revision = Self::try_parse(&caps[1])?;
            Ok(Revision::Parent(Box::new(base_revision)))
        } else if let Some(caps) = ancestor_regex.captures(revision) {
            let generations = caps[2]
                .parse::<usize>()
                .map_err(|_| Error::InvalidBranchName(revision.to_string()))?;
            let base_revision = Self::try_parse(&caps[1])?;
            Ok(Revision::Ancestor(Box::new(base_revision), generations))
        } else {
            let name = if revision == HEAD_ALIAS {
                HEAD_REF_NAME
            } else {
                revision
            };
            Ok(Revision::Ref(BranchName::try_parse(name)?))
        }
    }

    /// Resolve to a commit id
    pub fn resolve(&self, refs: &Refs, database: &Database) -> Result<ObjectId> {
        match self {
            Revision::Ref(name) => Self::resolve_name(name.as_ref(), refs, database),
            Revision::Parent(base) => {
                let oid = base.resolve(refs, database)?;
                Self::first_parent(&oid, database)?
                    .ok_or_else(|| Error::UnknownReference(self.to_string()))
            }
            Revision::Ancestor(base, generations) => {
                let mut oid = base.resolve(refs, database)?;
                for _ in 0..*generations {
                    oid = Self::first_parent(&oid, database)?
                        .ok_or_else(|| Error::UnknownReference(self.to_string()))?;
                }
                Ok(oid)
            }
        }
    }

    fn resolve_name(name: &str, refs: &Refs, database: &Database) -> Result<ObjectId> {
        if name == HEAD_REF_NAME {
            return refs
                .read_head()?
                .ok_or_else(|| Error::UnknownReference(HEAD_REF_NAME.to_string()));
        }

        let branch = BranchName::try_parse(name)?;
        for ref_name in [branch.to_ref_name(), branch.to_tag_ref_name()] {
            if let Some(oid) = refs.get_ref(&ref_name)? {
                return Ok(oid);
            }
        }

        if Self::looks_like_oid(name) {
            return Self::resolve_oid(name, database);
        }

        Err(Error::UnknownReference(name.to_string()))
    }

    fn resolve_oid(prefix: &str, database: &Database) -> Result<ObjectId> {
        if prefix.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(prefix)?;
            Self::ensure_commit(&oid, database)?;
            return Ok(oid);
        }

        let mut commits = database
            .find_objects_by_prefix(prefix)?
            .into_iter()
            .filter(|oid| {
                database
                    .object_type(oid)
                    .is_ok_and(|object_type| object_type == ObjectType::Commit)
            })
            .collect::<Vec<_>>();

        match commits.len() {
            0 => Err(Error::UnknownReference(prefix.to_string())),
            1 => Ok(commits.remove(0)),
            _ => Err(Error::AmbiguousObjectId {
                prefix: prefix.to_string(),
                candidates: commits,
            }),
        }
    }

    fn ensure_commit(oid: &ObjectId, database: &Database) -> Result<()> {
        let object_type = database.object_type(oid)?;
        if object_type != ObjectType::Commit {
            return Err(Error::UnexpectedObjectType {
                oid: oid.clone(),
                expected: ObjectType::Commit,
                actual: object_type,
            });
        }
        Ok(())
    }

    fn first_parent(oid: &ObjectId, database: &Database) -> Result<Option<ObjectId>> {
        Ok(database.load_commit(oid)?.parent().cloned())
    }

    fn looks_like_oid(s: &str) -> bool {
        s.len() >= MIN_ABBREVIATED_OID_LENGTH && ObjectId::is_hex_prefix(s)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Ref(name) => write!(f, "{name}"),
            Revision::Parent(base) => write!(f, "{base}^"),
            Revision::Ancestor(base, generations) => write!(f, "{base}~{generations}"),
        }
    }
}
