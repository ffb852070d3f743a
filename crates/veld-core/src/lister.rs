//! Listing assembler.
//!
//! Drives the filter stages in their fixed order, resolves records for
//! surviving leaf names, enforces the row limit, and applies plain-mode
//! short-circuiting and reverse ordering.

use crate::TRACING_TARGET;
use crate::config::ListerConfig;
use crate::error::{ListError, ListResult};
use crate::filter::{
    PipelineEntry, filter_delimiter, filter_end_marker, filter_marker, filter_prefix,
    filter_prefix_as_marker,
};
use crate::source::{NameSource, RecordResolver, Resolution};
use crate::types::{ListingRequest, ListingRow, Record};

/// Assembles paginated, optionally hierarchical listings from a flat sorted
/// namespace.
///
/// The same assembler serves both resource kinds: object names within a
/// container and container names within an account differ only in the
/// collaborators supplied.
pub struct Lister<S, R> {
    source: S,
    resolver: R,
    config: ListerConfig,
}

impl<S, R> Lister<S, R>
where
    S: NameSource,
    R: RecordResolver,
{
    /// Creates a new lister with the default configuration.
    pub fn new(source: S, resolver: R) -> Self {
        Self::with_config(source, resolver, ListerConfig::default())
    }

    /// Creates a new lister with an explicit configuration.
    pub fn with_config(source: S, resolver: R, config: ListerConfig) -> Self {
        Self {
            source,
            resolver,
            config,
        }
    }

    /// Returns the configuration for this lister.
    pub fn config(&self) -> &ListerConfig {
        &self.config
    }

    /// Runs one listing call.
    ///
    /// Returns rows in ascending order, or descending when
    /// [`ListingRequest::reverse`] is set (the marker window is interpreted
    /// as descending and filtered on its ascending equivalent). The call is
    /// all-or-nothing: either a complete row sequence or the first fatal
    /// error.
    pub async fn list(&self, request: &ListingRequest) -> ListResult<Vec<ListingRow>> {
        request.validate()?;
        let params = request.normalize();

        tracing::debug!(
            target: TRACING_TARGET,
            limit = params.limit,
            marker = ?params.marker,
            end_marker = ?params.end_marker,
            prefix = ?params.prefix,
            delimiter = ?params.delimiter,
            path = ?params.path,
            reverse = request.reverse,
            plain = request.plain,
            "Listing requested"
        );

        if params.limit == 0 {
            return Ok(Vec::new());
        }

        let names = self
            .source
            .enumerate()
            .await
            .map_err(ListError::Source)?;
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut names: Box<dyn Iterator<Item = String> + Send> = Box::new(names.into_iter());

        if let Some(end_marker) = params.end_marker.clone() {
            names = Box::new(filter_end_marker(names, end_marker));
        }

        // The lower bound: an applicable marker resumes strictly after its
        // name; otherwise the prefix itself acts as a synthetic inclusive
        // marker so the exact-prefix stages below never scan from the start.
        let prefix_floor = params.prefix.as_deref().unwrap_or("");
        match &params.marker {
            Some(marker) if marker.as_str() >= prefix_floor => {
                names = Box::new(filter_marker(names, marker.clone()));
            }
            _ => {
                if !prefix_floor.is_empty() {
                    names = Box::new(filter_prefix_as_marker(names, prefix_floor.to_owned()));
                }
            }
        }

        let entries: Box<dyn Iterator<Item = PipelineEntry> + Send> = match &params.prefix {
            // No prefix constraint at all; nothing left to filter.
            None => Box::new(names.map(PipelineEntry::Name)),
            Some(prefix) => match params.delimiter {
                None if prefix.is_empty() => Box::new(names.map(PipelineEntry::Name)),
                None => Box::new(filter_prefix(names, prefix.clone()).map(PipelineEntry::Name)),
                Some(delimiter) => Box::new(filter_delimiter(
                    names,
                    delimiter,
                    prefix.clone(),
                    params.marker.clone(),
                    params.path.clone(),
                )),
            },
        };

        let mut rows = if request.plain {
            self.assemble_plain(entries, params.limit)
        } else {
            self.assemble_full(entries, params.limit).await?
        };

        if request.reverse {
            rows.reverse();
        }

        tracing::debug!(
            target: TRACING_TARGET,
            rows = rows.len(),
            "Listing complete"
        );

        Ok(rows)
    }

    /// Names-only assembly: placeholder metadata, no resolver calls.
    fn assemble_plain(
        &self,
        entries: impl Iterator<Item = PipelineEntry>,
        limit: usize,
    ) -> Vec<ListingRow> {
        let mut rows = Vec::new();
        for entry in entries {
            rows.push(match entry {
                PipelineEntry::Name(name) => ListingRow::Entry(Record::placeholder(name)),
                PipelineEntry::CommonPrefix(name) => ListingRow::Subdir(name),
            });
            if rows.len() >= limit {
                break;
            }
        }
        rows
    }

    /// Full assembly: every leaf name is resolved into a record.
    async fn assemble_full(
        &self,
        entries: impl Iterator<Item = PipelineEntry> + Send,
        limit: usize,
    ) -> ListResult<Vec<ListingRow>> {
        let mut rows = Vec::new();
        for entry in entries {
            match entry {
                PipelineEntry::CommonPrefix(name) => rows.push(ListingRow::Subdir(name)),
                PipelineEntry::Name(name) => {
                    let resolution = self
                        .resolver
                        .resolve(&name)
                        .await
                        .map_err(ListError::Source)?;
                    let record = match resolution {
                        Resolution::Found(record) => record,
                        Resolution::Missing => {
                            // Deleted since the snapshot was enumerated.
                            tracing::trace!(
                                target: TRACING_TARGET,
                                name = %name,
                                "Name vanished during listing, skipped"
                            );
                            continue;
                        }
                        Resolution::Invalid => {
                            match self
                                .resolver
                                .synthesize(&name)
                                .await
                                .map_err(ListError::Source)?
                            {
                                Some(record) => record,
                                // The same race, hit mid-synthesis.
                                None => continue,
                            }
                        }
                    };
                    if !self.config.implicit_dir_objects && record.is_implicit_dir() {
                        continue;
                    }
                    rows.push(ListingRow::Entry(record));
                }
            }
            if rows.len() >= limit {
                break;
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mock::MemoryStore;
    use crate::types::ObjectType;

    fn lister(store: &Arc<MemoryStore>) -> Lister<Arc<MemoryStore>, Arc<MemoryStore>> {
        Lister::new(store.clone(), store.clone())
    }

    fn store_with(names: &[&str]) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        for name in names {
            store.insert_file(name, 3);
        }
        store
    }

    fn row_names(rows: &[ListingRow]) -> Vec<&str> {
        rows.iter().map(|row| row.name()).collect()
    }

    #[tokio::test]
    async fn test_flat_listing_in_order() {
        let store = store_with(&["a", "b", "c"]);
        let rows = lister(&store).list(&ListingRequest::new(100)).await.unwrap();
        assert_eq!(row_names(&rows), ["a", "b", "c"]);
        assert!(rows.iter().all(|row| !row.is_subdir()));
    }

    #[tokio::test]
    async fn test_limit_truncates() {
        let store = store_with(&["a", "b", "c"]);
        let rows = lister(&store).list(&ListingRequest::new(2)).await.unwrap();
        assert_eq!(row_names(&rows), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_zero_limit_is_empty_without_resolution() {
        let store = store_with(&["a", "b"]);
        let rows = lister(&store).list(&ListingRequest::new(0)).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(store.resolve_calls(), 0);
    }

    #[tokio::test]
    async fn test_pagination_is_continuous() {
        let store = store_with(&["a", "b", "c", "d", "e"]);
        let lister = lister(&store);

        let full = lister.list(&ListingRequest::new(4)).await.unwrap();

        let first = lister.list(&ListingRequest::new(2)).await.unwrap();
        let marker = first.last().unwrap().name().to_owned();
        let second = lister
            .list(&ListingRequest::new(2).with_marker(marker))
            .await
            .unwrap();

        let mut paged = first;
        paged.extend(second);
        assert_eq!(paged, full);
    }

    #[tokio::test]
    async fn test_pagination_over_rollup_boundary() {
        let store = store_with(&["a/1", "a/2", "b", "c/1", "d"]);
        let lister = lister(&store);
        let request = ListingRequest::new(2).with_delimiter('/');

        let first = lister.list(&request).await.unwrap();
        assert_eq!(row_names(&first), ["a/", "b"]);

        // Resuming at the roll-up row must not repeat it.
        let second = lister
            .list(&request.clone().with_marker("a/"))
            .await
            .unwrap();
        assert_eq!(row_names(&second), ["b", "c/"]);
    }

    #[tokio::test]
    async fn test_prefix_and_marker_window() {
        let store = store_with(&["a", "ba", "bb", "bc", "c"]);
        let rows = lister(&store)
            .list(
                &ListingRequest::new(100)
                    .with_prefix("b")
                    .with_marker("ba")
                    .with_end_marker("bc"),
            )
            .await
            .unwrap();
        assert_eq!(row_names(&rows), ["bb"]);
    }

    #[tokio::test]
    async fn test_reverse_matches_reversed_forward_window() {
        let store = store_with(&["a", "b", "c", "d", "e"]);
        let lister = lister(&store);

        let forward = lister
            .list(
                &ListingRequest::new(100)
                    .with_marker("a")
                    .with_end_marker("e"),
            )
            .await
            .unwrap();

        // The same window expressed descending: bounds swapped, reverse set.
        let backward = lister
            .list(
                &ListingRequest::new(100)
                    .with_marker("e")
                    .with_end_marker("a")
                    .with_reverse(true),
            )
            .await
            .unwrap();

        let mut expected = forward;
        expected.reverse();
        assert_eq!(backward, expected);
    }

    #[tokio::test]
    async fn test_plain_mode_returns_same_names() {
        let store = store_with(&["a/1", "a/2", "b"]);
        let lister = lister(&store);
        let request = ListingRequest::new(100).with_delimiter('/');

        let full = lister.list(&request).await.unwrap();
        let plain = lister
            .list(&request.clone().with_plain(true))
            .await
            .unwrap();

        assert_eq!(row_names(&plain), row_names(&full));
        assert_eq!(store.resolve_calls(), 1); // only the full-mode "b"
        for row in &plain {
            if let ListingRow::Entry(record) = row {
                assert_eq!(record.size, 0);
                assert_eq!(record.etag, "");
            }
        }
    }

    #[tokio::test]
    async fn test_vanished_name_is_skipped_silently() {
        let store = store_with(&["a", "b", "c"]);
        store.mark_vanished("b");
        let rows = lister(&store).list(&ListingRequest::new(100)).await.unwrap();
        assert_eq!(row_names(&rows), ["a", "c"]);
    }

    #[tokio::test]
    async fn test_invalid_record_is_synthesized() {
        let store = store_with(&["a", "b"]);
        store.mark_invalid("b");
        let rows = lister(&store).list(&ListingRequest::new(100)).await.unwrap();
        assert_eq!(row_names(&rows), ["a", "b"]);
        assert_eq!(store.synthesize_calls(), 1);
    }

    #[tokio::test]
    async fn test_vanish_during_synthesis_is_skipped() {
        let store = store_with(&["a", "b"]);
        store.mark_invalid("b");
        store.mark_vanishing_on_synthesis("b");
        let rows = lister(&store).list(&ListingRequest::new(100)).await.unwrap();
        assert_eq!(row_names(&rows), ["a"]);
    }

    #[tokio::test]
    async fn test_implicit_dir_skipped_when_disallowed() {
        let store = store_with(&["a"]);
        store.insert_dir("d", ObjectType::DirPlaceholder);
        store.insert_dir("m", ObjectType::DirObject);

        let config = ListerConfig {
            implicit_dir_objects: false,
        };
        let lister = Lister::with_config(store.clone(), store.clone(), config);
        let rows = lister.list(&ListingRequest::new(100)).await.unwrap();
        assert_eq!(row_names(&rows), ["a", "m"]);
    }

    #[tokio::test]
    async fn test_implicit_dir_kept_by_default() {
        let store = store_with(&["a"]);
        store.insert_dir("d", ObjectType::DirPlaceholder);
        let rows = lister(&store).list(&ListingRequest::new(100)).await.unwrap();
        assert_eq!(row_names(&rows), ["a", "d"]);
    }

    #[tokio::test]
    async fn test_path_listing_shows_direct_children() {
        let store = store_with(&["p", "p/a", "p/b/c", "q"]);
        let rows = lister(&store)
            .list(&ListingRequest::new(100).with_path("p"))
            .await
            .unwrap();
        assert_eq!(row_names(&rows), ["p/a", "p/b/"]);
        assert!(rows[1].is_subdir());
    }

    #[tokio::test]
    async fn test_invalid_delimiter_rejected_before_enumeration() {
        let store = store_with(&["a"]);
        let err = lister(&store)
            .list(&ListingRequest::new(100).with_delimiter('\u{ff}'))
            .await
            .unwrap_err();
        assert!(matches!(err, ListError::InvalidRequest(_)));
        assert_eq!(store.enumerate_calls(), 0);
    }

    #[tokio::test]
    async fn test_source_failure_fails_the_call() {
        let store = store_with(&["a"]);
        store.fail_enumeration("disk offline");
        let err = lister(&store).list(&ListingRequest::new(100)).await.unwrap_err();
        assert!(matches!(err, ListError::Source(_)));
    }
}
