use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::sanitize::sanitize_entry_path;

/// Extract a zip archive into `dest`.
///
/// Every entry path is sanitized against `dest` first; unix modes from the
/// archive are applied to extracted files. Returns the number of entries
/// written.
pub fn extract(archive_path: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|_| Error::Corrupted)?;
    fs::create_dir_all(dest)?;

    let mut written = 0usize;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|_| Error::Corrupted)?;
        let raw_path = entry.enclosed_name().ok_or(Error::InvalidPath)?;
        let target = sanitize_entry_path(&raw_path, dest)?;

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        written += 1;

        apply_unix_mode(&target, entry.unix_mode())?;
        debug!(entry = %raw_path.display(), "extracted");
    }

    info!(archive = %archive_path.display(), dest = %dest.display(), written, "extraction complete");
    Ok(written)
}

/// Make a file executable (0o755). The server binary ships without the
/// exec bit in some archive builds.
pub fn ensure_executable(path: &Path) -> Result<()> {
    apply_unix_mode(path, Some(0o755))
}

#[cfg(unix)]
fn apply_unix_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_unix_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}

/// Convenience used by reinstall: drop the installed binary so the next
/// start extracts a fresh copy.
pub fn remove_installed(binary: &Path) -> Result<bool> {
    match fs::remove_file(binary) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::Io(e)),
    }
}
