use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolve an archive entry path against `base`, rejecting anything that
/// would land outside it.
pub fn sanitize_entry_path(entry: &Path, base: &Path) -> Result<PathBuf> {
    if entry.is_absolute() {
        return Err(Error::InvalidPath);
    }

    let normalized = normalize(entry)?;
    if normalized.as_os_str().is_empty() {
        return Err(Error::InvalidPath);
    }

    let resolved = base.join(&normalized);
    if !resolved.starts_with(base) {
        return Err(Error::ZipSlip {
            entry: entry.to_path_buf(),
            resolved,
        });
    }

    Ok(resolved)
}

/// Collapse `.` and resolve `..` lexically. A `..` with nothing left to
/// pop means the entry tries to climb above the archive root.
fn normalize(path: &Path) -> Result<PathBuf> {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => result.push(part),
            Component::ParentDir => {
                if !result.pop() {
                    return Err(Error::InvalidPath);
                }
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return Err(Error::InvalidPath),
        }
    }
    Ok(result)
}
