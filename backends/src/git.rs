//! Git repository storage.
//!
//! Object ids are git revision expressions (`v1:Cond/IOVs`, `HEAD:`), so
//! tags, branches and commit hashes all work as the tag part of a key.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use conddb_engine::backend::strip_tag;
use conddb_engine::{Backend, CondDbError, DirListing, Object, Result};
use git2::{ObjectType, Repository};

/// A git repository, bare or with a working tree.
///
/// The repository handle is dropped by [`Backend::disconnect`] and re-opened
/// on the next access.
pub struct GitBackend {
    path: PathBuf,
    repo: Mutex<Option<Repository>>,
}

fn open_repository(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|e| {
        CondDbError::backend_unavailable_with_source(
            format!("cannot open repository {}", path.display()),
            e,
        )
    })
}

impl GitBackend {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let repo = open_repository(&path)?;
        tracing::debug!(path = %path.display(), bare = repo.is_bare(), "opened git repository");
        Ok(Self {
            path,
            repo: Mutex::new(Some(repo)),
        })
    }

    fn with_repo<T>(&self, f: impl FnOnce(&Repository) -> Result<T>) -> Result<T> {
        let mut guard = self
            .repo
            .lock()
            .map_err(|_| CondDbError::internal("git repository lock poisoned"))?;
        let repo = match guard.take() {
            Some(repo) => repo,
            None => {
                tracing::debug!(path = %self.path.display(), "re-opening git repository");
                open_repository(&self.path)?
            }
        };
        f(guard.insert(repo))
    }
}

fn unresolved(object_id: &str, e: git2::Error) -> CondDbError {
    CondDbError::not_found_with_source(format!("cannot resolve object {object_id}"), e)
}

fn list_tree(object_id: &str, tree: &git2::Tree<'_>) -> DirListing {
    let mut listing = DirListing {
        root: strip_tag(object_id).to_string(),
        ..DirListing::default()
    };
    for entry in tree.iter() {
        let name = String::from_utf8_lossy(entry.name_bytes()).into_owned();
        if entry.kind() == Some(ObjectType::Tree) {
            listing.dirs.push(name);
        } else {
            listing.files.push(name);
        }
    }
    listing
}

impl Backend for GitBackend {
    fn connected(&self) -> bool {
        self.repo.lock().map(|g| g.is_some()).unwrap_or(false)
    }

    fn disconnect(&self) {
        let Ok(mut guard) = self.repo.lock() else {
            return;
        };
        if guard.take().is_some() {
            tracing::debug!(path = %self.path.display(), "closed git repository");
        }
    }

    fn exists(&self, object_id: &str) -> Result<bool> {
        self.with_repo(|repo| Ok(repo.revparse_single(object_id).is_ok()))
    }

    fn get(&self, object_id: &str) -> Result<Object> {
        self.with_repo(|repo| {
            let object = repo
                .revparse_single(object_id)
                .map_err(|e| unresolved(object_id, e))?;

            if let Some(blob) = object.as_blob() {
                return Ok(Object::Blob(blob.content().to_vec()));
            }

            let tree = object.peel_to_tree().map_err(|e| {
                CondDbError::invalid_data_with_source(format!("invalid type at {object_id}"), e)
            })?;
            Ok(Object::Tree(list_tree(object_id, &tree)))
        })
    }

    fn commit_time(&self, commit_id: &str) -> Result<DateTime<Utc>> {
        self.with_repo(|repo| {
            let commit = repo
                .revparse_single(commit_id)
                .and_then(|object| object.peel_to_commit())
                .map_err(|e| unresolved(commit_id, e))?;
            let seconds = commit.time().seconds();
            DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
                CondDbError::invalid_data(format!(
                    "commit time {seconds} of {commit_id} is out of range"
                ))
            })
        })
    }
}
