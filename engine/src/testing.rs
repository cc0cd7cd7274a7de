//! In-memory backend for engine unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};

use crate::backend::{Backend, DirListing, Object, UNBOUNDED_COMMIT_TIME, strip_tag};
use crate::errors::{CondDbError, Result};

enum Node {
    Blob(Vec<u8>),
    Tree(BTreeMap<String, Node>),
}

/// Tree of blobs built from `(path, content)` pairs. Tags are ignored.
pub(crate) struct MemoryBackend {
    root: Node,
    pub(crate) exists_calls: AtomicUsize,
}

impl MemoryBackend {
    pub(crate) fn new(files: &[(&str, &str)]) -> Self {
        let mut root = BTreeMap::new();
        for (path, content) in files {
            insert(&mut root, path, content);
        }
        Self {
            root: Node::Tree(root),
            exists_calls: AtomicUsize::new(0),
        }
    }

    fn find(&self, object_id: &str) -> Option<&Node> {
        let mut node = &self.root;
        for part in strip_tag(object_id).split('/').filter(|p| !p.is_empty()) {
            match node {
                Node::Tree(children) => node = children.get(part)?,
                Node::Blob(_) => return None,
            }
        }
        Some(node)
    }
}

fn insert(tree: &mut BTreeMap<String, Node>, path: &str, content: &str) {
    match path.split_once('/') {
        Some((dir, rest)) => {
            let child = tree
                .entry(dir.to_string())
                .or_insert_with(|| Node::Tree(BTreeMap::new()));
            if let Node::Tree(children) = child {
                insert(children, rest, content);
            }
        }
        None => {
            tree.insert(path.to_string(), Node::Blob(content.as_bytes().to_vec()));
        }
    }
}

impl Backend for MemoryBackend {
    fn connected(&self) -> bool {
        true
    }

    fn disconnect(&self) {}

    fn exists(&self, object_id: &str) -> Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.find(object_id).is_some())
    }

    fn get(&self, object_id: &str) -> Result<Object> {
        match self.find(object_id) {
            Some(Node::Blob(data)) => Ok(Object::Blob(data.clone())),
            Some(Node::Tree(children)) => {
                let mut listing = DirListing {
                    root: strip_tag(object_id).to_string(),
                    ..DirListing::default()
                };
                // reversed so that consumers cannot rely on backend ordering
                for (name, child) in children.iter().rev() {
                    match child {
                        Node::Tree(_) => listing.dirs.push(name.clone()),
                        Node::Blob(_) => listing.files.push(name.clone()),
                    }
                }
                Ok(Object::Tree(listing))
            }
            None => Err(CondDbError::not_found(format!(
                "cannot resolve object {object_id}"
            ))),
        }
    }

    fn commit_time(&self, _commit_id: &str) -> Result<DateTime<Utc>> {
        Ok(UNBOUNDED_COMMIT_TIME)
    }
}
