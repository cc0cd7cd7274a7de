//! Condition database engine.
//!
//! Resolves `(tag, path, time point)` keys against a versioned object store
//! whose directories may carry `IOVs` index files partitioning time into
//! intervals of validity. Storage is abstracted behind [`Backend`]; the
//! git, filesystem and JSON implementations live in `conddb-backends`.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod backend;
pub mod boundaries;
pub mod catalog;
pub mod db;
pub mod errors;
pub mod index;
pub mod iov;
pub mod path;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use backend::{Backend, DirListing, Object, UNBOUNDED_COMMIT_TIME};
pub use boundaries::Leaf;
pub use db::{CondDb, ScopedConnection};
pub use errors::{CondDbError, ErrorCategory, Result};
pub use index::INDEX_NAME;
pub use iov::{Iov, TimePoint};
pub use resolver::{Key, Resolved, Resolver};
