//! Listing request parameters.

use serde::{Deserialize, Serialize};

use crate::error::{ListError, ListResult};

/// Highest delimiter code point accepted by a request.
///
/// The roll-up stage computes the exclusive upper bound of a group as the
/// group stem plus the delimiter's successor character, so code point 255 is
/// reserved for that sentinel and can never itself be a delimiter.
pub const MAX_DELIMITER: u32 = 254;

/// Parameters for one listing call.
///
/// Markers are the standard pagination bounds: `marker` is an exclusive lower
/// bound ("resume after this name"), `end_marker` an exclusive upper bound.
/// `prefix` restricts results to names starting with it, and `delimiter`
/// groups names sharing a common prefix up to the delimiter into roll-up
/// rows. `path` lists the direct children of one pseudo-directory and forces
/// `delimiter = '/'`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ListingRequest {
    /// Maximum number of rows to return.
    pub limit: usize,
    /// Exclusive lower bound on returned names.
    pub marker: Option<String>,
    /// Exclusive upper bound on returned names.
    pub end_marker: Option<String>,
    /// Restrict results to names starting with this prefix.
    pub prefix: Option<String>,
    /// Group names into pseudo-directories at this separator.
    pub delimiter: Option<char>,
    /// List the direct children of this pseudo-directory.
    pub path: Option<String>,
    /// Return rows in descending order.
    pub reverse: bool,
    /// Skip per-name record resolution, returning names only.
    pub plain: bool,
}

impl ListingRequest {
    /// Creates a new request returning at most `limit` rows.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Sets the pagination marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Sets the end marker.
    pub fn with_end_marker(mut self, end_marker: impl Into<String>) -> Self {
        self.end_marker = Some(end_marker.into());
        self
    }

    /// Sets the name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the grouping delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Sets the pseudo-directory path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Requests descending order.
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Requests a plain (names-only) listing.
    pub fn with_plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    /// Checks the request invariants, without touching any storage.
    pub fn validate(&self) -> ListResult<()> {
        if let Some(delimiter) = self.delimiter
            && delimiter as u32 > MAX_DELIMITER
        {
            return Err(ListError::invalid_request(format!(
                "delimiter {delimiter:?} exceeds code point {MAX_DELIMITER}"
            )));
        }
        Ok(())
    }

    /// Resolves the effective filter parameters.
    ///
    /// `path` overrides prefix and delimiter: a non-empty path becomes the
    /// prefix with its trailing slashes collapsed to exactly one, an empty
    /// path yields an empty prefix. Without a path, a delimiter with no
    /// prefix defaults the prefix to the empty string. Empty markers are
    /// inert, and a reverse request with both markers set swaps them so the
    /// ascending filters operate on the equivalent ascending window.
    pub(crate) fn normalize(&self) -> Normalized {
        let mut prefix = self.prefix.clone();
        let mut delimiter = self.delimiter;
        let mut path = None;

        if let Some(raw) = &self.path {
            let normalized = if raw.is_empty() {
                String::new()
            } else {
                format!("{}/", raw.trim_end_matches('/'))
            };
            prefix = Some(normalized.clone());
            path = Some(normalized);
            delimiter = Some('/');
        } else if delimiter.is_some() && prefix.is_none() {
            prefix = Some(String::new());
        }

        let mut marker = self.marker.clone().filter(|m| !m.is_empty());
        let mut end_marker = self.end_marker.clone().filter(|m| !m.is_empty());
        if self.reverse && marker.is_some() && end_marker.is_some() {
            std::mem::swap(&mut marker, &mut end_marker);
        }

        Normalized {
            limit: self.limit,
            marker,
            end_marker,
            prefix,
            delimiter,
            path,
        }
    }
}

/// Effective filter parameters after path/delimiter defaulting and the
/// reverse marker swap.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Normalized {
    pub(crate) limit: usize,
    pub(crate) marker: Option<String>,
    pub(crate) end_marker: Option<String>,
    pub(crate) prefix: Option<String>,
    pub(crate) delimiter: Option<char>,
    pub(crate) path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_slash_delimiter() {
        assert!(ListingRequest::new(100).with_delimiter('/').validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_reserved_delimiter() {
        let request = ListingRequest::new(100).with_delimiter('\u{ff}');
        assert!(matches!(
            request.validate(),
            Err(ListError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_path_forces_slash_delimiter_and_prefix() {
        let normalized = ListingRequest::new(10).with_path("photos").normalize();
        assert_eq!(normalized.prefix.as_deref(), Some("photos/"));
        assert_eq!(normalized.path.as_deref(), Some("photos/"));
        assert_eq!(normalized.delimiter, Some('/'));
    }

    #[test]
    fn test_path_trailing_slashes_collapse() {
        let normalized = ListingRequest::new(10).with_path("photos///").normalize();
        assert_eq!(normalized.prefix.as_deref(), Some("photos/"));
        assert_eq!(normalized.path.as_deref(), Some("photos/"));
    }

    #[test]
    fn test_empty_path_yields_empty_prefix() {
        let normalized = ListingRequest::new(10).with_path("").normalize();
        assert_eq!(normalized.prefix.as_deref(), Some(""));
        assert_eq!(normalized.path.as_deref(), Some(""));
        assert_eq!(normalized.delimiter, Some('/'));
    }

    #[test]
    fn test_delimiter_defaults_missing_prefix() {
        let normalized = ListingRequest::new(10).with_delimiter('/').normalize();
        assert_eq!(normalized.prefix.as_deref(), Some(""));
    }

    #[test]
    fn test_empty_markers_are_inert() {
        let normalized = ListingRequest::new(10)
            .with_marker("")
            .with_end_marker("")
            .normalize();
        assert_eq!(normalized.marker, None);
        assert_eq!(normalized.end_marker, None);
    }

    #[test]
    fn test_reverse_swaps_marker_window() {
        let normalized = ListingRequest::new(10)
            .with_marker("m")
            .with_end_marker("e")
            .with_reverse(true)
            .normalize();
        assert_eq!(normalized.marker.as_deref(), Some("e"));
        assert_eq!(normalized.end_marker.as_deref(), Some("m"));
    }

    #[test]
    fn test_reverse_without_both_markers_does_not_swap() {
        let normalized = ListingRequest::new(10)
            .with_marker("m")
            .with_reverse(true)
            .normalize();
        assert_eq!(normalized.marker.as_deref(), Some("m"));
        assert_eq!(normalized.end_marker, None);
    }
}
