//! Listing error types.

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Collaborators ([`crate::NameSource`], [`crate::RecordResolver`]) erase
/// their concrete error types behind this alias so the core stays decoupled
/// from any particular storage backend.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for listing operations.
pub type ListResult<T> = Result<T, ListError>;

/// Errors that can occur during a listing call.
///
/// Transient races (a name vanishing between enumeration and resolution) and
/// invalid stored records are recovered inside the pipeline and never appear
/// here; a listing call either returns a complete row sequence or fails as a
/// whole with one of these.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    /// The request parameters are malformed and the listing was not attempted.
    #[error("invalid listing request: {0}")]
    InvalidRequest(String),

    /// Name enumeration or record resolution failed in the underlying storage.
    #[error("name source unavailable: {0}")]
    Source(#[source] BoxedError),
}

impl ListError {
    /// Creates a new invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates a new source error from a collaborator failure.
    pub fn source(err: impl Into<BoxedError>) -> Self {
        Self::Source(err.into())
    }
}
