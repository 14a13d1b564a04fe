use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Normalize a path by resolving `.` and `..` components without filesystem
/// access. Leading `..` components of relative paths are kept, an empty result
/// becomes `.`.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

/// Join `path` onto `base` (`path` wins if it's absolute) and normalize the
/// result.
pub fn join_normalized(base: &Path, path: &Path) -> PathBuf {
    normalize_path(&base.join(path))
}

/// Make `path` absolute by resolving it against the current directory, then
/// normalize it. Symbolic links are left untouched.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize_path(path))
    } else {
        let current_dir =
            std::env::current_dir().context("Failed to get the current directory")?;
        Ok(join_normalized(&current_dir, path))
    }
}

/// Express `path` relative to `start`. Both are made absolute first, so the
/// result may start with `..` components.
pub fn relative_path(path: &Path, start: &Path) -> Result<PathBuf> {
    let path = absolute_path(path)?;
    let start = absolute_path(start)?;

    let mut path_components = path.components().peekable();
    let mut start_components = start.components().peekable();
    while let (Some(a), Some(b)) = (path_components.peek(), start_components.peek()) {
        if a != b {
            break;
        }
        path_components.next();
        start_components.next();
    }

    let relative: PathBuf = start_components
        .map(|_| Component::ParentDir)
        .chain(path_components)
        .collect();
    if relative.as_os_str().is_empty() {
        Ok(PathBuf::from("."))
    } else {
        Ok(relative)
    }
}
