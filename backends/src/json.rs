//! Storage backed by a single JSON document.
//!
//! String values are files, objects are directories:
//!
//! ```json
//! {"Cond": {"IOVs": "0 v0\n100 v1\n", "v0": "data 0", "v1": "data 1"}}
//! ```
//!
//! Tags are ignored.

use std::path::Path;

use chrono::{DateTime, Utc};
use conddb_engine::backend::strip_tag;
use conddb_engine::{Backend, CondDbError, DirListing, Object, Result, UNBOUNDED_COMMIT_TIME};
use serde_json::Value;

pub struct JsonBackend {
    root: Value,
}

impl JsonBackend {
    /// Parse `source` as an inline document when it starts with `{`,
    /// otherwise read it as the path of a JSON file.
    pub fn parse(source: &str) -> Result<Self> {
        let root: Value = if source.trim_start().starts_with('{') {
            serde_json::from_str(source)
                .map_err(|e| CondDbError::invalid_data_with_source("invalid JSON", e))?
        } else {
            let text = std::fs::read_to_string(Path::new(source))
                .map_err(|e| CondDbError::invalid_data_with_source("invalid JSON", e))?;
            tracing::debug!(path = source, "read JSON document");
            serde_json::from_str(&text)
                .map_err(|e| CondDbError::invalid_data_with_source("invalid JSON", e))?
        };

        if !root.is_object() {
            return Err(CondDbError::invalid_data("invalid JSON"));
        }
        Ok(Self { root })
    }

    fn find(&self, object_id: &str) -> Option<&Value> {
        strip_tag(object_id)
            .split('/')
            .filter(|part| !part.is_empty())
            .try_fold(&self.root, |node, part| node.as_object()?.get(part))
    }
}

impl Backend for JsonBackend {
    fn connected(&self) -> bool {
        true
    }

    fn disconnect(&self) {}

    fn exists(&self, object_id: &str) -> Result<bool> {
        if !object_id.contains(':') {
            return Ok(true);
        }
        Ok(self.find(object_id).is_some())
    }

    fn get(&self, object_id: &str) -> Result<Object> {
        match self.find(object_id) {
            Some(Value::String(data)) => Ok(Object::Blob(data.clone().into_bytes())),
            Some(Value::Object(children)) => {
                let mut listing = DirListing {
                    root: strip_tag(object_id).to_string(),
                    ..DirListing::default()
                };
                for (name, child) in children {
                    if child.is_object() {
                        listing.dirs.push(name.clone());
                    } else {
                        listing.files.push(name.clone());
                    }
                }
                Ok(Object::Tree(listing))
            }
            Some(_) => Err(CondDbError::invalid_data(format!(
                "invalid type at {object_id}"
            ))),
            None => Err(CondDbError::not_found(format!(
                "cannot resolve object {object_id}"
            ))),
        }
    }

    fn commit_time(&self, _commit_id: &str) -> Result<DateTime<Utc>> {
        Ok(UNBOUNDED_COMMIT_TIME)
    }
}
