//! Listing result rows.

use serde::{Deserialize, Serialize};

use super::Record;

/// One row of a listing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingRow {
    /// A concrete name with its resolved record.
    Entry(Record),
    /// A roll-up row standing in for every name sharing a common prefix up
    /// to the delimiter (a pseudo-subdirectory).
    Subdir(String),
}

impl ListingRow {
    /// Returns the name this row lists.
    pub fn name(&self) -> &str {
        match self {
            Self::Entry(record) => &record.name,
            Self::Subdir(name) => name,
        }
    }

    /// Returns true for a roll-up row.
    pub fn is_subdir(&self) -> bool {
        matches!(self, Self::Subdir(_))
    }
}
