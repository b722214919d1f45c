use crate::errors::{Error, Result};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Read the `<type> <size>\0` header, returning the type and declared size
    pub fn parse_header(reader: &mut impl BufRead) -> Result<(ObjectType, usize)> {
        let mut object_type = Vec::new();
        reader
            .read_until(b' ', &mut object_type)
            .map_err(|e| Error::MalformedObject(format!("unreadable header: {e}")))?;
        if object_type.pop() != Some(b' ') {
            return Err(Error::MalformedObject("missing object type".to_string()));
        }

        let mut size = Vec::new();
        reader
            .read_until(b'\0', &mut size)
            .map_err(|e| Error::MalformedObject(format!("unreadable header: {e}")))?;
        if size.pop() != Some(b'\0') {
            return Err(Error::MalformedObject("missing object size".to_string()));
        }

        let object_type = std::str::from_utf8(&object_type)
            .map_err(|_| Error::MalformedObject("object type is not utf-8".to_string()))?;
        let size = std::str::from_utf8(&size)
            .ok()
            .and_then(|size| size.parse::<usize>().ok())
            .ok_or_else(|| Error::MalformedObject("object size is not a number".to_string()))?;

        Ok((ObjectType::try_from(object_type)?, size))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            other => Err(Error::MalformedObject(format!(
                "unknown object type '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
