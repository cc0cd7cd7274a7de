//! Shared fixtures for backend integration tests.

// Not every test binary uses every fixture
#![allow(dead_code)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use git2::{IndexAddOption, Repository, Signature, Time};
use tempfile::TempDir;

/// Author and committer time of every fixture commit (2017-01-01 CET).
pub const COMMIT_TIME: i64 = 1_483_225_200;

/// Layout tagged `v0`: one index with two entries.
pub const V0_FILES: &[(&str, &str)] = &[
    ("TheDir/TheFile.txt", "some data\n"),
    ("Cond/IOVs", "0 v0\n100 v1\n"),
    ("Cond/v0", "data 0"),
    ("Cond/v1", "data 1"),
    ("Direct/Cond1", "<condition name=\"Cond1\"/>"),
    ("Direct/Cond2/IOVs", "0 v0\n"),
    ("Direct/Cond2/v0", "<condition name=\"Cond2\"/>"),
    ("Direct/Nested/Leaf", "leaf"),
    ("Direct/README.txt", "not a condition"),
];

/// Changes on top of `v0` tagged `v1`: the middle range is split through a
/// nested index with relative entries.
pub const V1_FILES: &[(&str, &str)] = &[
    ("Cond/IOVs", "0 v0\n100 group\n200 v3\n"),
    ("Cond/group/IOVs", "100 ../v1\n150 ../v2\n"),
    ("Cond/v2", "data 2"),
    ("Cond/v3", "data 3"),
];

pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let target = root.join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&target, content).expect("write fixture file");
    }
}

fn commit_all(repo: &Repository, message: &str, tag: &str) {
    let mut index = repo.index().expect("open index");
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .expect("stage files");
    index.write().expect("write index");
    let tree_id = index.write_tree().expect("write tree");
    let tree = repo.find_tree(tree_id).expect("find tree");

    let signature = Signature::new("Test", "test@example.com", &Time::new(COMMIT_TIME, 0))
        .expect("signature");
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    let oid = repo
        .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .expect("commit");
    let commit = repo.find_commit(oid).expect("find commit");
    repo.tag_lightweight(tag, commit.as_object(), false)
        .expect("tag commit");
}

/// Working-tree repository with two tagged commits, `v0` then `v1` (HEAD).
pub fn git_repository() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = Repository::init(dir.path()).expect("init repository");

    write_files(dir.path(), V0_FILES);
    commit_all(&repo, "initial conditions", "v0");

    write_files(dir.path(), V1_FILES);
    commit_all(&repo, "split middle range", "v1");

    dir
}

/// Plain directory holding the `v1` layout.
pub fn directory_tree() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write_files(dir.path(), V0_FILES);
    write_files(dir.path(), V1_FILES);
    dir
}

/// JSON document holding the `v1` layout.
pub const JSON_DOCUMENT: &str = r#"{
    "TheDir": {"TheFile.txt": "some data\n"},
    "Cond": {
        "IOVs": "0 v0\n100 group\n200 v3\n",
        "v0": "data 0",
        "v1": "data 1",
        "v2": "data 2",
        "v3": "data 3",
        "group": {"IOVs": "100 ../v1\n150 ../v2\n"}
    },
    "Direct": {
        "Cond1": "<condition name=\"Cond1\"/>",
        "Cond2": {"IOVs": "0 v0\n", "v0": "<condition name=\"Cond2\"/>"},
        "Nested": {"Leaf": "leaf"},
        "README.txt": "not a condition"
    }
}"#;
