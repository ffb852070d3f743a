//! Per-name display records.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};

/// Content type assigned to directory entries.
pub const DIR_CONTENT_TYPE: &str = "application/directory";

/// Content type assigned to regular file entries.
pub const FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type carried by plain-mode placeholder records.
pub const PLAIN_CONTENT_TYPE: &str = "text/plain";

/// How an entry came to exist in the namespace.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr, Serialize, Deserialize, Default,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    /// A regular file entry.
    #[default]
    File,
    /// A directory that exists only because entries were created below it.
    DirPlaceholder,
    /// A directory created as a first-class object in its own right.
    DirObject,
}

/// Display record for one name in the namespace.
///
/// Produced by a [`crate::RecordResolver`], either from stored metadata or
/// synthesized on demand from physical attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The name this record describes.
    pub name: String,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Size in bytes.
    pub size: u64,
    /// MIME content type.
    pub content_type: String,
    /// How the entry came to exist.
    pub object_type: ObjectType,
    /// Content hash of the entry.
    pub etag: String,
}

impl Record {
    /// Creates a new record with the given attributes.
    pub fn new(
        name: impl Into<String>,
        created_at: Timestamp,
        size: u64,
        content_type: impl Into<String>,
        etag: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            created_at,
            size,
            content_type: content_type.into(),
            object_type: ObjectType::File,
            etag: etag.into(),
        }
    }

    /// Sets the object type.
    pub fn with_object_type(mut self, object_type: ObjectType) -> Self {
        self.object_type = object_type;
        self
    }

    /// Builds the fixed placeholder record used for plain-mode rows.
    ///
    /// Plain listings skip per-name resolution entirely, so every row carries
    /// the same zeroed metadata.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Timestamp::UNIX_EPOCH,
            size: 0,
            content_type: PLAIN_CONTENT_TYPE.to_owned(),
            object_type: ObjectType::File,
            etag: String::new(),
        }
    }

    /// Returns true for a directory entry that was never created as a
    /// first-class object.
    pub fn is_implicit_dir(&self) -> bool {
        self.content_type == DIR_CONTENT_TYPE && self.object_type != ObjectType::DirObject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_zeroed() {
        let record = Record::placeholder("a/b");
        assert_eq!(record.name, "a/b");
        assert_eq!(record.created_at, Timestamp::UNIX_EPOCH);
        assert_eq!(record.size, 0);
        assert_eq!(record.content_type, PLAIN_CONTENT_TYPE);
        assert_eq!(record.etag, "");
    }

    #[test]
    fn test_implicit_dir_detection() {
        let dir = Record::new("d", Timestamp::UNIX_EPOCH, 0, DIR_CONTENT_TYPE, "")
            .with_object_type(ObjectType::DirPlaceholder);
        assert!(dir.is_implicit_dir());

        let marker = dir.clone().with_object_type(ObjectType::DirObject);
        assert!(!marker.is_implicit_dir());

        let file = Record::new("f", Timestamp::UNIX_EPOCH, 4, FILE_CONTENT_TYPE, "abcd");
        assert!(!file.is_implicit_dir());
    }
}
