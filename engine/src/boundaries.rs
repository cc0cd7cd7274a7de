//! Enumeration of validity change points over a time range.
//!
//! Unlike [`crate::Resolver`], which follows the single index entry valid
//! at one time point, this walks every entry overlapping the range and
//! records each terminal object reached together with the part of the
//! range it covers.

use std::collections::BTreeSet;

use crate::backend::{Backend, join};
use crate::errors::Result;
use crate::index::{self, INDEX_NAME};
use crate::iov::{Iov, TimePoint};
use crate::path::normalize;
use crate::resolver::Resolver;

/// A terminal object and the sub-range during which it is the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub iov: Iov,
    pub object_id: String,
}

/// All terminal objects reachable from `tag:path` within `range`, in
/// index order.
///
/// An invalid `range` or a missing root object yields no leaves.
pub fn leaves(backend: &dyn Backend, tag: &str, path: &str, range: Iov) -> Result<Vec<Leaf>> {
    if !range.valid() {
        tracing::debug!(%range, "invalid range, no boundaries");
        return Ok(Vec::new());
    }

    let object_id = format!("{tag}:{}", normalize(path));
    if !backend.exists(&object_id)? {
        tracing::debug!(%object_id, "root object missing, no boundaries");
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    collect(backend, object_id, range, &mut out)?;
    Ok(out)
}

/// Distinct start points of every leaf interval within `range`, ascending.
pub fn boundaries(
    backend: &dyn Backend,
    tag: &str,
    path: &str,
    range: Iov,
) -> Result<Vec<TimePoint>> {
    let since: BTreeSet<TimePoint> = leaves(backend, tag, path, range)?
        .into_iter()
        .map(|leaf| leaf.iov.since)
        .collect();
    Ok(since.into_iter().collect())
}

fn collect(
    backend: &dyn Backend,
    object_id: String,
    limits: Iov,
    out: &mut Vec<Leaf>,
) -> Result<()> {
    if !backend.exists(&join(&object_id, INDEX_NAME))? {
        tracing::trace!(%object_id, %limits, "leaf");
        out.push(Leaf {
            iov: limits,
            object_id,
        });
        return Ok(());
    }

    let text = Resolver::new(backend).read_index(&object_id)?;
    for entry in index::entries(&text) {
        if entry.iov.overlaps(&limits) {
            let child = normalize(&join(&object_id, &entry.key));
            collect(backend, child, entry.iov.intersection(&limits), out)?;
        }
    }
    Ok(())
}
