use std::path::PathBuf;

use chrono::Local;
use tracing::info;

use bedrun_archive::{Error as ArchiveError, backup_dir, backup_file_name};

use crate::config::LauncherConfig;

/// Back up `worlds/` into `backups/world-backup-<timestamp>.zip`.
///
/// Returns the backup path, or `None` when there is nothing to back up
/// yet (a server that never ran has no worlds).
pub fn backup_world(cfg: &LauncherConfig) -> anyhow::Result<Option<PathBuf>> {
    let data = cfg.data_path();
    let worlds = data.join("worlds");
    let backups = data.join("backups");

    std::fs::create_dir_all(&backups)?;
    let dest = backups.join(backup_file_name(Local::now()));

    match backup_dir(&worlds, &dest) {
        Ok(report) => {
            let mb = report.bytes as f64 / (1024.0 * 1024.0);
            info!(
                backup = %dest.display(),
                entries = report.entries,
                "world backup created ({mb:.1} MiB uncompressed)"
            );
            Ok(Some(dest))
        }
        Err(ArchiveError::NothingToBackup { .. }) => {
            info!("no worlds to back up yet");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
