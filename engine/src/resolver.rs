//! Key to payload resolution through nested `IOVs` indices.
//!
//! Resolution of `(tag, path, t)` fetches `tag:path` and then:
//! - a blob is the answer, valid for the bounds accumulated so far;
//! - a directory with an `IOVs` index selects the entry valid at `t`,
//!   narrows the bounds to that entry and recurses into it (entries may be
//!   relative, e.g. `../v1`, to share data between time ranges);
//! - any other directory is answered with its catalog document, valid
//!   forever.
//!
//! Recursion depth equals the nesting depth of indices; a chain of aliases
//! thousands of hops long can exhaust the stack.

use crate::backend::{Backend, Object, join};
use crate::catalog;
use crate::errors::{CondDbError, Result};
use crate::index::{self, INDEX_NAME};
use crate::iov::{Iov, TimePoint};
use crate::path::normalize;

/// What the caller asks for: a path under a tag, at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub tag: String,
    pub path: String,
    pub time_point: TimePoint,
}

impl Key {
    pub fn new(tag: impl Into<String>, path: impl Into<String>, time_point: TimePoint) -> Self {
        Self {
            tag: tag.into(),
            path: path.into(),
            time_point,
        }
    }

    /// Backend address of this key: `<tag>:<normalized path>`.
    pub fn object_id(&self) -> String {
        format!("{}:{}", self.tag, normalize(&self.path))
    }

    /// The same query one level down, at `target` relative to this path.
    pub fn descend(&self, target: &str) -> Self {
        Self {
            tag: self.tag.clone(),
            path: join(&self.path, target),
            time_point: self.time_point,
        }
    }
}

/// Outcome of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Payload and the interval during which it is the answer.
    Found { data: Vec<u8>, iov: Iov },
    /// Nothing is valid at the requested time within the requested bounds.
    NotValid,
}

impl Resolved {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// The validity interval; [`Iov::invalid`] when nothing was found.
    pub fn iov(&self) -> Iov {
        match self {
            Self::Found { iov, .. } => *iov,
            Self::NotValid => Iov::invalid(),
        }
    }

    /// Payload bytes; empty when nothing was found.
    pub fn data(&self) -> &[u8] {
        match self {
            Self::Found { data, .. } => data,
            Self::NotValid => &[],
        }
    }

    /// Split into `(payload, iov)`, mapping `NotValid` to an empty payload
    /// with an invalid interval.
    pub fn into_parts(self) -> (Vec<u8>, Iov) {
        match self {
            Self::Found { data, iov } => (data, iov),
            Self::NotValid => (Vec::new(), Iov::invalid()),
        }
    }
}

/// Resolves keys against one backend.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    backend: &'a dyn Backend,
}

impl<'a> Resolver<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    /// Resolve `key` within `bounds`.
    ///
    /// Backend failures (including an unaddressable object id) propagate
    /// unchanged; an index with no entry valid at the key's time inside
    /// `bounds` yields [`Resolved::NotValid`].
    pub fn resolve(&self, key: &Key, bounds: Iov) -> Result<Resolved> {
        let object_id = key.object_id();
        tracing::debug!(%object_id, t = key.time_point, %bounds, "resolving");

        let listing = match self.backend.get(&object_id)? {
            Object::Blob(data) => return Ok(Resolved::Found { data, iov: bounds }),
            Object::Tree(listing) => listing,
        };

        if !listing.files.iter().any(|f| f == INDEX_NAME) {
            let document = catalog::build(self.backend, &object_id, listing)?;
            return Ok(Resolved::Found {
                data: document.into_bytes(),
                iov: Iov::default(),
            });
        }

        let index = self.read_index(&object_id)?;
        let (target, iov) = index::lookup(&index, key.time_point, &bounds);
        if !iov.valid() || target.is_empty() {
            tracing::debug!(%object_id, t = key.time_point, %bounds, "no entry valid at time");
            return Ok(Resolved::NotValid);
        }

        tracing::debug!(%object_id, entry = %target, %iov, "following index entry");
        self.resolve(&key.descend(&target), iov)
    }

    /// Text of the `IOVs` index inside directory `object_id`.
    pub fn read_index(&self, object_id: &str) -> Result<String> {
        let index_id = join(object_id, INDEX_NAME);
        match self.backend.get(&index_id)? {
            Object::Blob(bytes) => String::from_utf8(bytes).map_err(|e| {
                CondDbError::invalid_data_with_source(
                    format!("index {index_id} is not valid UTF-8"),
                    e,
                )
            }),
            Object::Tree(_) => Err(CondDbError::invalid_data(format!(
                "index {index_id} is a directory"
            ))),
        }
    }
}
