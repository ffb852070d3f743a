//! Lister configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::Lister`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListerConfig {
    /// Whether directories that were never created as first-class objects
    /// appear in full listings.
    ///
    /// When disabled, a resolved record with the directory content type that
    /// is not an explicit dir object is dropped from the result.
    pub implicit_dir_objects: bool,
}

impl Default for ListerConfig {
    fn default() -> Self {
        Self {
            implicit_dir_objects: true,
        }
    }
}
