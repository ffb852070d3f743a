//! Composable filter stages over a sorted name sequence.
//!
//! Each stage is an independent transform taking and returning a lazy
//! iterator, so the listing assembler can chain them without materializing
//! intermediate lists and each stage can be tested on its own. All stages
//! assume their input is sorted ascending in byte-lexicographic order; that
//! sortedness is what lets [`filter_prefix`], [`filter_end_marker`], and
//! [`filter_delimiter`] stop consuming early instead of scanning to the end.

/// One item flowing out of the delimiter stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEntry {
    /// A concrete name to be resolved into a leaf row.
    Name(String),
    /// A common prefix standing in for every name grouped below it.
    CommonPrefix(String),
}

impl PipelineEntry {
    /// Returns the name or common prefix carried by this entry.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name(name) | Self::CommonPrefix(name) => name,
        }
    }
}

/// Returns the longest leading run of names strictly less than `end_marker`.
///
/// Stops consuming the source at the first name reaching the bound.
pub fn filter_end_marker<I>(names: I, end_marker: String) -> impl Iterator<Item = String>
where
    I: Iterator<Item = String>,
{
    names.take_while(move |name| *name < end_marker)
}

/// Returns all names strictly greater than `marker`.
pub fn filter_marker<I>(names: I, marker: String) -> impl Iterator<Item = String>
where
    I: Iterator<Item = String>,
{
    names.filter(move |name| *name > marker)
}

/// Returns all names greater than or equal to `prefix`.
///
/// The prefix acts as a synthetic inclusive marker: it positions the cursor
/// at the start of the prefix window without excluding the prefix itself,
/// sparing the downstream prefix filters a linear scan from the beginning.
pub fn filter_prefix_as_marker<I>(names: I, prefix: String) -> impl Iterator<Item = String>
where
    I: Iterator<Item = String>,
{
    names.filter(move |name| *name >= prefix)
}

/// Returns all names starting with `prefix`.
///
/// Once at least one match has been seen, the first non-matching name ends
/// the iteration entirely: matches form a contiguous run in sorted order, so
/// nothing later can match.
pub fn filter_prefix<I>(names: I, prefix: String) -> impl Iterator<Item = String>
where
    I: Iterator<Item = String>,
{
    names
        .scan(false, move |found, name| {
            if name.starts_with(&prefix) {
                *found = true;
                Some(Some(name))
            } else if *found {
                None
            } else {
                Some(None)
            }
        })
        .flatten()
}

/// Groups sorted names into pseudo-directories at `delimiter`.
///
/// Names without a delimiter past the prefix pass through as
/// [`PipelineEntry::Name`]; names with one collapse into a single
/// [`PipelineEntry::CommonPrefix`] per group, with every further descendant
/// of the group skipped via an exclusive upper-bound cursor (the group stem
/// plus the delimiter's successor character). A roll-up equal to `marker` is
/// suppressed so a paginated walk does not repeat the boundary row.
///
/// `path` names the pseudo-directory's own entry, which is dropped rather
/// than listed among its children. Path mode also changes the roll-up
/// boundary rule: any delimiter occurrence forms a group, while default mode
/// requires characters after the delimiter (a name ending exactly at the
/// delimiter stays a leaf). The asymmetry is intentional and covered by the
/// boundary tests below.
pub fn filter_delimiter<I>(
    names: I,
    delimiter: char,
    prefix: String,
    marker: Option<String>,
    path: Option<String>,
) -> impl Iterator<Item = PipelineEntry>
where
    I: Iterator<Item = String>,
{
    DelimiterFilter {
        names,
        delimiter,
        prefix,
        marker,
        path,
        skip_name: None,
        done: false,
    }
}

struct DelimiterFilter<I> {
    names: I,
    delimiter: char,
    prefix: String,
    marker: Option<String>,
    path: Option<String>,
    skip_name: Option<String>,
    done: bool,
}

impl<I> Iterator for DelimiterFilter<I>
where
    I: Iterator<Item = String>,
{
    type Item = PipelineEntry;

    fn next(&mut self) -> Option<PipelineEntry> {
        if self.done {
            return None;
        }
        loop {
            let Some(name) = self.names.next() else {
                self.done = true;
                return None;
            };
            if !self.prefix.is_empty() && !name.starts_with(&self.prefix) {
                // Sorted input: the contiguous prefix run has ended.
                self.done = true;
                return None;
            }
            if self.path.as_deref() == Some(name.as_str()) {
                // The directory's own placeholder entry, not a child.
                continue;
            }
            if let Some(skip_name) = &self.skip_name {
                if name < *skip_name {
                    // Known descendant of the group already rolled up.
                    continue;
                }
                self.skip_name = None;
            }
            let Some(found) = name[self.prefix.len()..].find(self.delimiter) else {
                return Some(PipelineEntry::Name(name));
            };
            let end = self.prefix.len() + found;
            let delimiter_len = self.delimiter.len_utf8();
            let has_trailing = end + delimiter_len < name.len();
            if self.path.is_none() && !has_trailing {
                // Default mode: a name ending exactly at the delimiter is a
                // leaf, not a group.
                return Some(PipelineEntry::Name(name));
            }
            let group = name[..end + delimiter_len].to_owned();
            self.skip_name = Some(format!("{}{}", &name[..end], successor(self.delimiter)));
            if self.marker.as_deref() != Some(group.as_str()) {
                return Some(PipelineEntry::CommonPrefix(group));
            }
        }
    }
}

/// Returns the character one code point past `delimiter`, the exclusive
/// upper bound for everything nested under a group.
fn successor(delimiter: char) -> char {
    // Request validation caps delimiters at code point 254, so the successor
    // always exists.
    char::from_u32(delimiter as u32 + 1).unwrap_or('\u{ff}')
}
