//! Destination key mapping
//!
//! Object keys are slash-delimited strings whatever the host platform uses
//! as a path separator.

use std::path::{Component, Path};

/// Render a relative path with forward slashes.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Join the destination prefix and a relative key component.
///
/// Joining follows path semantics: empty and `.` segments vanish, `..` drops
/// the segment before it, and a leading `/` on the prefix is kept.
///
/// ```
/// use s3_upload_action::source::key::object_key;
///
/// assert_eq!(object_key("assets/", "css/site.css"), "assets/css/site.css");
/// assert_eq!(object_key("", "a.txt"), "a.txt");
/// ```
pub fn object_key(prefix: &str, relative: &str) -> String {
    let rooted = prefix.starts_with(['/', '\\']);
    let mut segments: Vec<&str> = Vec::new();

    for segment in prefix.split(['/', '\\']).chain(relative.split(['/', '\\'])) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{}", joined)
    } else {
        joined
    }
}
