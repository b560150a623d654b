use std::path::{Component, Path, PathBuf};

/// Lexically cleans `path`: drops `.` components and resolves `..` against
/// the component before it. The filesystem is not consulted.
pub(crate) fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                // `..` at the root is the root.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }

    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Reduces a torrent name to a single path component.
///
/// Separators split the name into segments; empty, `.` and `..` segments are
/// dropped and the rest are joined with `_`. Returns `None` when nothing
/// usable is left.
pub(crate) fn normalize_name(name: &str) -> Option<String> {
    let segments: Vec<&str> = name
        .split(['/', '\\'])
        .filter(|s| !matches!(*s, "" | "." | ".."))
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("_"))
    }
}

/// Checks one component of a multi-file `path` list.
///
/// Stricter than a plain non-empty check: `.`, `..`, separators and NUL are
/// refused so the joined path always stays under the torrent's root.
pub(crate) fn check_path_component(component: &str) -> Result<(), &'static str> {
    match component {
        "" => Err("empty path component"),
        "." | ".." => Err("path traversal component"),
        c if c.contains(['/', '\\', '\0']) => Err("separator in path component"),
        _ => Ok(()),
    }
}
