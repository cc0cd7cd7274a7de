//! Catalog documents for plain (non time-partitioned) directories.
//!
//! A subdirectory that holds its own `IOVs` index is condition data and is
//! listed as a condition; any other subdirectory is a nested catalog. Files
//! with a document extension are never listed as conditions.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::backend::{Backend, DirListing, join};
use crate::errors::Result;
use crate::index::INDEX_NAME;

/// File suffixes that are documents, not conditions.
pub const RESERVED_SUFFIXES: [&str; 2] = [".xml", ".txt"];

fn is_reserved(entry: &str) -> bool {
    RESERVED_SUFFIXES
        .iter()
        .any(|suffix| entry.ends_with(suffix))
}

const HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="ISO-8859-1"?>"#,
    r#"<!DOCTYPE DDDB SYSTEM "git:/DTD/structure.dtd">"#,
);

/// Sub-catalogs and conditions of one directory, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub name: String,
    pub catalogs: BTreeSet<String>,
    pub conditions: BTreeSet<String>,
}

impl Catalog {
    /// Classify the entries of `listing`, probing `<object_id>/<dir>/IOVs`
    /// for every subdirectory.
    pub fn classify(backend: &dyn Backend, object_id: &str, listing: DirListing) -> Result<Self> {
        let DirListing { root, dirs, files } = listing;

        let mut catalogs = BTreeSet::new();
        let mut conditions: BTreeSet<String> = files.into_iter().collect();

        for dir in dirs {
            let index_id = join(&join(object_id, &dir), INDEX_NAME);
            if backend.exists(&index_id)? {
                conditions.insert(dir);
            } else {
                catalogs.insert(dir);
            }
        }
        conditions.retain(|entry| !is_reserved(entry));

        Ok(Self {
            name: root.rsplit('/').next().unwrap_or_default().to_string(),
            catalogs,
            conditions,
        })
    }

    /// Render the catalog as an XML document.
    pub fn render(&self) -> String {
        let name = &self.name;
        let mut out = String::from(HEADER);
        let _ = write!(out, r#"<DDDB><catalog name="{name}">"#);
        for entry in &self.catalogs {
            let _ = write!(out, r#"<catalogref href="{name}/{entry}"/>"#);
        }
        for entry in &self.conditions {
            let _ = write!(out, r#"<conditionref href="{name}/{entry}"/>"#);
        }
        out.push_str("</catalog></DDDB>");
        out
    }
}

/// Build and render the catalog document of a plain directory.
pub fn build(backend: &dyn Backend, object_id: &str, listing: DirListing) -> Result<String> {
    let catalog = Catalog::classify(backend, object_id, listing)?;
    tracing::debug!(
        object_id,
        catalogs = catalog.catalogs.len(),
        conditions = catalog.conditions.len(),
        "catalog built"
    );
    Ok(catalog.render())
}
