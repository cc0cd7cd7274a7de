//! The storage contract the engine resolves against.
//!
//! Object ids follow the `<tag>:<path>` convention of git revision syntax.
//! Backends that have no notion of tags ignore everything up to the first
//! `:`.

use chrono::{DateTime, Utc};

use crate::errors::Result;

/// Raw listing of a directory object.
///
/// `root` is the tag-free path of the directory. Entry order is whatever
/// the backend produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    pub root: String,
    pub dirs: Vec<String>,
    pub files: Vec<String>,
}

/// Content of an object: either bytes or a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Vec<u8>),
    Tree(DirListing),
}

/// A versioned object store that can answer existence, content and commit
/// time queries.
///
/// Implementations own any synchronisation their connection state needs;
/// the engine calls these methods from `&self` and adds no locking.
pub trait Backend: Send + Sync {
    /// Whether the underlying store is currently open.
    fn connected(&self) -> bool;

    /// Release the underlying store. Backends that support it re-open lazily
    /// on the next access.
    fn disconnect(&self);

    fn exists(&self, object_id: &str) -> Result<bool>;

    fn get(&self, object_id: &str) -> Result<Object>;

    /// Commit time of a revision. Backends without history return
    /// [`UNBOUNDED_COMMIT_TIME`].
    fn commit_time(&self, commit_id: &str) -> Result<DateTime<Utc>>;
}

/// Sentinel commit time for backends with no notion of history.
pub const UNBOUNDED_COMMIT_TIME: DateTime<Utc> = DateTime::<Utc>::MAX_UTC;

/// Drop the `<tag>:` prefix of an object id, if any.
pub fn strip_tag(object_id: &str) -> &str {
    match object_id.split_once(':') {
        Some((_, path)) => path,
        None => object_id,
    }
}

/// Append `name` to an object id or path without doubling separators.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() || parent.ends_with(':') || parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}
