//! Plain directory tree storage. Tags are ignored.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use conddb_engine::backend::strip_tag;
use conddb_engine::{Backend, CondDbError, DirListing, Object, Result, UNBOUNDED_COMMIT_TIME};

pub struct FilesystemBackend {
    root: PathBuf,
}

impl FilesystemBackend {
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(CondDbError::backend_unavailable(format!(
                "invalid path {}",
                root.display()
            )));
        }
        tracing::debug!(root = %root.display(), "opened directory tree");
        Ok(Self { root })
    }

    /// Path of `object_id` under the root, or `None` when it would climb
    /// out of the root through `..`.
    fn locate(&self, object_id: &str) -> Option<PathBuf> {
        let relative = Path::new(strip_tag(object_id).trim_start_matches('/'));
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            tracing::debug!(object_id, "rejecting id outside the root");
            return None;
        }
        Some(self.root.join(relative))
    }
}

fn unresolved(object_id: &str) -> CondDbError {
    CondDbError::not_found(format!("cannot resolve object {object_id}"))
}

fn io_error(object_id: &str, e: std::io::Error) -> CondDbError {
    if e.kind() == ErrorKind::NotFound {
        CondDbError::not_found_with_source(format!("cannot resolve object {object_id}"), e)
    } else {
        CondDbError::backend_unavailable_with_source(format!("cannot read {object_id}"), e)
    }
}

impl Backend for FilesystemBackend {
    fn connected(&self) -> bool {
        true
    }

    fn disconnect(&self) {}

    fn exists(&self, object_id: &str) -> Result<bool> {
        if !object_id.contains(':') {
            return Ok(true);
        }
        Ok(self.locate(object_id).as_deref().is_some_and(Path::exists))
    }

    fn get(&self, object_id: &str) -> Result<Object> {
        let path = self
            .locate(object_id)
            .ok_or_else(|| unresolved(object_id))?;
        let metadata = std::fs::metadata(&path).map_err(|e| io_error(object_id, e))?;
        if !metadata.is_dir() {
            let data = std::fs::read(&path).map_err(|e| io_error(object_id, e))?;
            return Ok(Object::Blob(data));
        }

        let mut listing = DirListing {
            root: strip_tag(object_id).to_string(),
            ..DirListing::default()
        };
        for entry in std::fs::read_dir(&path).map_err(|e| io_error(object_id, e))? {
            let entry = entry.map_err(|e| io_error(object_id, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() {
                listing.dirs.push(name);
            } else {
                listing.files.push(name);
            }
        }
        listing.dirs.sort();
        listing.files.sort();
        Ok(Object::Tree(listing))
    }

    fn commit_time(&self, _commit_id: &str) -> Result<DateTime<Utc>> {
        Ok(UNBOUNDED_COMMIT_TIME)
    }
}
