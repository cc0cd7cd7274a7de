//! The user-facing database handle.

use chrono::{DateTime, Utc};

use crate::backend::Backend;
use crate::boundaries::{self, Leaf};
use crate::errors::Result;
use crate::iov::{Iov, TimePoint};
use crate::resolver::{Key, Resolved, Resolver};

/// A condition database over one storage backend.
///
/// The handle owns its backend; moving the handle moves the connection and
/// dropping it releases the store.
pub struct CondDb {
    backend: Box<dyn Backend>,
}

impl CondDb {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn connected(&self) -> bool {
        self.backend.connected()
    }

    /// Release the underlying store. Backends that support it re-open on the
    /// next access.
    pub fn disconnect(&self) {
        tracing::debug!("disconnecting backend");
        self.backend.disconnect();
    }

    /// Guard that disconnects the backend when dropped.
    pub fn scoped_connection(&self) -> ScopedConnection<'_> {
        ScopedConnection { db: self }
    }

    /// Payload valid for `key` at its time point, with no bounds.
    pub fn get(&self, key: &Key) -> Result<Resolved> {
        self.get_within(key, Iov::default())
    }

    /// Payload valid for `key` at its time point, with the returned interval
    /// cut to `bounds`.
    pub fn get_within(&self, key: &Key, bounds: Iov) -> Result<Resolved> {
        Resolver::new(self.backend()).resolve(key, bounds)
    }

    /// Distinct start points of validity intervals of `tag:path` within
    /// `range`, ascending.
    pub fn iov_boundaries(&self, tag: &str, path: &str, range: Iov) -> Result<Vec<TimePoint>> {
        boundaries::boundaries(self.backend(), tag, path, range)
    }

    /// Terminal objects of `tag:path` within `range` with the sub-range each
    /// one covers.
    pub fn iov_leaves(&self, tag: &str, path: &str, range: Iov) -> Result<Vec<Leaf>> {
        boundaries::leaves(self.backend(), tag, path, range)
    }

    pub fn commit_time(&self, commit_id: &str) -> Result<DateTime<Utc>> {
        self.backend.commit_time(commit_id)
    }
}

impl std::fmt::Debug for CondDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CondDb")
            .field("connected", &self.connected())
            .finish()
    }
}

/// Disconnects the database on drop.
#[must_use = "the connection is released as soon as the guard is dropped"]
pub struct ScopedConnection<'a> {
    db: &'a CondDb,
}

impl ScopedConnection<'_> {
    pub fn db(&self) -> &CondDb {
        self.db
    }
}

impl std::ops::Deref for ScopedConnection<'_> {
    type Target = CondDb;

    fn deref(&self) -> &CondDb {
        self.db
    }
}

impl Drop for ScopedConnection<'_> {
    fn drop(&mut self) {
        self.db.disconnect();
    }
}
