//! Collaborator seams: name enumeration and record resolution.

use async_trait::async_trait;

use crate::error::BoxedError;
use crate::types::Record;

/// The resolver's answer for one name.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A stored record exists and passed validation.
    Found(Record),
    /// The name no longer exists in the underlying storage.
    ///
    /// This is the benign race with a concurrent delete: the name was present
    /// when the snapshot was enumerated and has vanished since. The listing
    /// drops the row and continues.
    Missing,
    /// The name exists but its stored record is absent or failed validation;
    /// a fresh record must be synthesized from physical attributes.
    Invalid,
}

/// Produces the current sorted snapshot of candidate names for one container
/// or account.
///
/// Sortedness (ascending, byte-lexicographic) and snapshot consistency are
/// this trait's contract to honor; the filter stages rely on both for their
/// early-termination behavior.
#[async_trait]
pub trait NameSource: Send + Sync {
    /// Returns the sorted candidate names.
    async fn enumerate(&self) -> Result<Vec<String>, BoxedError>;
}

#[async_trait]
impl<T> NameSource for std::sync::Arc<T>
where
    T: NameSource + ?Sized,
{
    async fn enumerate(&self) -> Result<Vec<String>, BoxedError> {
        (**self).enumerate().await
    }
}

/// Fetches or synthesizes the display record for one name.
#[async_trait]
pub trait RecordResolver: Send + Sync {
    /// Looks up and validates the stored record for `name`.
    async fn resolve(&self, name: &str) -> Result<Resolution, BoxedError>;

    /// Rebuilds a record for `name` from physical attributes, persisting it
    /// for future lookups.
    ///
    /// Returns `None` when the name vanished before synthesis could stat it,
    /// the same benign race as [`Resolution::Missing`].
    async fn synthesize(&self, name: &str) -> Result<Option<Record>, BoxedError>;
}

#[async_trait]
impl<T> RecordResolver for std::sync::Arc<T>
where
    T: RecordResolver + ?Sized,
{
    async fn resolve(&self, name: &str) -> Result<Resolution, BoxedError> {
        (**self).resolve(name).await
    }

    async fn synthesize(&self, name: &str) -> Result<Option<Record>, BoxedError> {
        (**self).synthesize(name).await
    }
}
