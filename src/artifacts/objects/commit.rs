//! Commit object
//!
//! A commit records one complete snapshot (its tree), the commits it was derived
//! from (zero parents for a root commit, two or more for a merge), who made it and
//! when, and a message.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::io::BufRead;

/// Date formats accepted when an author date is given as text
const AUTHOR_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Author or committer identity with the moment of authorship
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Identity stamped with the current local time
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new_with_timestamp(name, email, chrono::Local::now().fixed_offset())
    }

    pub fn new_with_timestamp(
        name: impl Into<String>,
        email: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Author {
            name: name.into(),
            email: email.into(),
            timestamp,
        }
    }

    /// Parse an RFC 2822 date or `%Y-%m-%d %H:%M:%S %z`
    pub fn parse_date(date: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc2822(date)
            .or_else(|_| DateTime::parse_from_str(date, AUTHOR_DATE_FORMAT))
            .ok()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// "Name <email>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// "Name <email> seconds offset", the serialized form
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        // "name <email> timestamp timezone", split from the right
        let parts = value.rsplitn(3, ' ').collect::<Vec<_>>();
        let [timezone, seconds, identity] = parts[..] else {
            return Err(Error::MalformedObject(format!("invalid author '{value}'")));
        };

        let seconds = seconds
            .parse::<i64>()
            .map_err(|_| Error::MalformedObject(format!("invalid author timestamp '{seconds}'")))?;

        let (Some(email_start), Some(email_end)) = (identity.find('<'), identity.rfind('>'))
        else {
            return Err(Error::MalformedObject(format!(
                "invalid author identity '{identity}'"
            )));
        };
        let name = identity[..email_start].trim().to_string();
        let email = identity[email_start + 1..email_end].to_string();

        let offset = DateTime::parse_from_str(&format!("1970-01-01 00:00:00 {timezone}"), AUTHOR_DATE_FORMAT)
            .map_err(|_| Error::MalformedObject(format!("invalid author timezone '{timezone}'")))?
            .offset()
            .to_owned();
        let timestamp = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| Error::MalformedObject(format!("timestamp {seconds} out of range")))?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp,
        })
    }
}

/// Parents and timestamp only, enough for graph walks
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// The author also becomes the committer
    pub fn new(parents: Vec<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parents,
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    /// First line of the message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.committer.timestamp()
    }

    pub fn to_slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents.clone(),
            timestamp: self.timestamp(),
        }
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        Ok(Bytes::from(self.display()))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| Error::MalformedObject(format!("unreadable commit: {e}")))?;

        let (headers, message) = content
            .split_once("\n\n")
            .unwrap_or((content.as_str(), ""));
        let mut lines = headers.lines().peekable();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| Error::MalformedObject("commit without tree line".to_string()))?;
        let tree_oid = ObjectId::try_parse(tree_oid)?;

        let mut parents = Vec::new();
        while let Some(parent) = lines.peek().and_then(|line| line.strip_prefix("parent ")) {
            parents.push(ObjectId::try_parse(parent)?);
            lines.next();
        }

        let author = lines
            .next()
            .and_then(|line| line.strip_prefix("author "))
            .ok_or_else(|| Error::MalformedObject("commit without author line".to_string()))?;
        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .ok_or_else(|| Error::MalformedObject("commit without committer line".to_string()))?;

        Ok(Commit {
            parents,
            tree_oid,
            author: Author::try_from(author)?,
            committer: Author::try_from(committer)?,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        lines.extend(self.parents.iter().map(|parent| format!("parent {parent}")));
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
    }
}
