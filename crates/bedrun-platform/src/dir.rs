use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::Disks;

use crate::error::{Error, Result};

const WRITE_PROBE: &str = ".write-probe";

/// Expand a leading `~/` against the user's home directory.
///
/// Paths without the prefix are returned unchanged, as is `~/...` when no
/// home directory can be determined.
pub fn expand(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = home::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

/// Create the data directory if needed and verify it is writable.
///
/// Writability is checked with a throwaway probe file rather than metadata,
/// since mode bits don't account for read-only mounts.
pub fn prepare(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })?;

    let probe = path.join(WRITE_PROBE);
    fs::write(&probe, b"probe").map_err(|e| Error::NotWritable {
        path: path.to_path_buf(),
        source: e,
    })?;
    let _ = fs::remove_file(&probe);

    Ok(())
}

/// Free space in GiB on the disk holding `path`, if it can be determined.
pub fn free_space_gb(path: &Path) -> Option<f64> {
    let resolved = path.canonicalize().ok()?;
    let disks = Disks::new_with_refreshed_list();

    // Pick the disk with the longest mount point that is a prefix of the
    // path, so nested mounts win over "/".
    let disk = disks
        .list()
        .iter()
        .filter(|d| resolved.starts_with(d.mount_point()))
        .max_by_key(|d| d.mount_point().as_os_str().len())?;

    Some(disk.available_space() as f64 / (1024.0 * 1024.0 * 1024.0))
}
