//! Lexical normalization of slash-separated object paths.

/// Collapse `/./` and `/<segment>/../` until the path stops changing.
///
/// A `..` with no preceding segment is left in place; the backend rejects
/// such ids later if they do not address anything. A `..` segment is never
/// consumed by a following `..`.
///
/// ```
/// use conddb_engine::path::normalize;
///
/// assert_eq!(normalize("/a/b/../c"), "/a/c");
/// assert_eq!(normalize("/a/./b"), "/a/b");
/// assert_eq!(normalize("v1:Cond/group/../v1"), "v1:Cond/v1");
/// ```
pub fn normalize(path: &str) -> String {
    let mut current = path.to_string();
    while let Some(next) = collapse_once(&current) {
        current = next;
    }
    current
}

/// Apply the leftmost applicable rewrite, or `None` at a fixed point.
fn collapse_once(path: &str) -> Option<String> {
    if let Some(pos) = path.find("/./") {
        return Some(format!("{}{}", &path[..pos], &path[pos + 2..]));
    }

    let mut start = path.find('/')?;
    while let Some(len) = path[start + 1..].find('/') {
        let end = start + 1 + len;
        let segment = &path[start + 1..end];
        if !segment.is_empty() && segment != ".." && path[end..].starts_with("/../") {
            return Some(format!("{}{}", &path[..start], &path[end + 3..]));
        }
        start = end;
    }
    None
}
