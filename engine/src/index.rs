//! Parsing of `IOVs` index objects.
//!
//! An index object is plain text, one entry per line, sorted by timestamp:
//!
//! ```text
//! 0 v0
//! 100 group
//! 200 v2
//! ```
//!
//! Each entry is valid from its own timestamp up to the next entry's
//! timestamp; the last one is unbounded above. Well-formed input is the
//! caller's responsibility: lines without a leading decimal timestamp are
//! skipped and a missing key reads as the empty string.

use crate::iov::{Iov, TimePoint};

/// Reserved name of the index object that makes a directory time-partitioned.
pub const INDEX_NAME: &str = "IOVs";

/// One parsed index entry with the interval it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: String,
    pub iov: Iov,
}

fn parse_line(line: &str) -> Option<(TimePoint, &str)> {
    let mut fields = line.split_whitespace();
    let since = fields.next()?.parse().ok()?;
    Some((since, fields.next().unwrap_or_default()))
}

/// Find the entry valid at `t`, clipped to `boundary`.
///
/// When `t` falls outside `boundary` the result is an empty key with
/// [`Iov::invalid`]. A query before the first entry yields an empty key with
/// the interval up to that first entry.
pub fn lookup(index: &str, t: TimePoint, boundary: &Iov) -> (String, Iov) {
    if !boundary.contains(t) {
        tracing::trace!(t, %boundary, "query outside bounds");
        return (String::new(), Iov::invalid());
    }

    let mut key = "";
    let mut iov = Iov::default();
    for (since, entry_key) in index.lines().filter_map(parse_line) {
        if since > t {
            iov.until = since;
            break;
        }
        key = entry_key;
        iov.since = since;
    }
    iov.cut(boundary);

    tracing::trace!(t, key, %iov, "index lookup");
    (key.to_string(), iov)
}

/// All entries of an index, each with the interval it covers.
pub fn entries(index: &str) -> Vec<IndexEntry> {
    let parsed: Vec<(TimePoint, &str)> = index.lines().filter_map(parse_line).collect();
    parsed
        .iter()
        .enumerate()
        .map(|(i, (since, key))| IndexEntry {
            key: (*key).to_string(),
            iov: Iov::new(
                *since,
                parsed.get(i + 1).map_or(Iov::MAX, |(until, _)| *until),
            ),
        })
        .collect()
}
