//! Storage backends for the condition database engine.
//!
//! [`connect`] picks the backend from a repository string:
//!
//! | prefix  | backend               | rest of the string        |
//! |---------|-----------------------|---------------------------|
//! | `git:`  | [`GitBackend`]        | repository path           |
//! | `file:` | [`FilesystemBackend`] | root directory            |
//! | `json:` | [`JsonBackend`]       | inline document or a path |
//! | none    | [`GitBackend`]        | the whole string          |

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod filesystem;
pub mod git;
pub mod json;

pub use filesystem::FilesystemBackend;
pub use git::GitBackend;
pub use json::JsonBackend;

use conddb_engine::{Backend, CondDb, Result};

/// Open the repository described by `repository` and wrap it in a
/// [`CondDb`].
pub fn connect(repository: &str) -> Result<CondDb> {
    let backend: Box<dyn Backend> = if let Some(path) = repository.strip_prefix("git:") {
        Box::new(GitBackend::open(path)?)
    } else if let Some(root) = repository.strip_prefix("file:") {
        Box::new(FilesystemBackend::open(root)?)
    } else if let Some(source) = repository.strip_prefix("json:") {
        Box::new(JsonBackend::parse(source)?)
    } else {
        Box::new(GitBackend::open(repository)?)
    };
    tracing::info!(repository = %display_name(repository), "connected");
    Ok(CondDb::new(backend))
}

/// Repository string for logs, with inline JSON documents elided.
fn display_name(repository: &str) -> &str {
    match repository.strip_prefix("json:") {
        Some(source) if source.trim_start().starts_with('{') => "json:<inline>",
        _ => repository,
    }
}
