use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackupReport {
    pub entries: usize,
    pub bytes: u64,
}

/// Render the timestamped backup file name, e.g.
/// `world-backup-20260806-153000.zip`.
pub fn backup_file_name(now: DateTime<Local>) -> String {
    format!("world-backup-{}.zip", now.format("%Y%m%d-%H%M%S"))
}

/// Zip `src_dir` recursively into `dest_zip` with deflate compression.
///
/// Entry names are relative to `src_dir`. An absent or empty source is an
/// error so callers can tell "no worlds yet" apart from a zero-byte backup.
pub fn backup_dir(src_dir: &Path, dest_zip: &Path) -> Result<BackupReport> {
    if !dir_has_entries(src_dir) {
        return Err(Error::NothingToBackup {
            path: src_dir.to_path_buf(),
        });
    }

    let file = File::create(dest_zip)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut report = BackupReport {
        entries: 0,
        bytes: 0,
    };
    add_dir(&mut writer, src_dir, src_dir, options, &mut report)?;
    writer.finish().map_err(io::Error::from)?;

    info!(
        src = %src_dir.display(),
        dest = %dest_zip.display(),
        entries = report.entries,
        bytes = report.bytes,
        "backup written"
    );
    Ok(report)
}

fn dir_has_entries(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

fn add_dir(
    writer: &mut zip::ZipWriter<File>,
    root: &Path,
    dir: &Path,
    options: SimpleFileOptions,
    report: &mut BackupReport,
) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = relative_name(root, &path)?;

        if entry.file_type()?.is_dir() {
            writer.add_directory(name, options).map_err(io::Error::from)?;
            add_dir(writer, root, &path, options, report)?;
        } else {
            writer.start_file(name, options).map_err(io::Error::from)?;
            let content = std::fs::read(&path)?;
            writer.write_all(&content)?;
            report.entries += 1;
            report.bytes += content.len() as u64;
        }
    }
    Ok(())
}

fn relative_name(root: &Path, path: &Path) -> Result<String> {
    let relative: PathBuf = path
        .strip_prefix(root)
        .map_err(|_| Error::InvalidPath)?
        .to_path_buf();
    // Zip entry names always use forward slashes.
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_carries_timestamp() {
        let when = Local.with_ymd_and_hms(2026, 8, 6, 15, 30, 0).unwrap();
        assert_eq!(backup_file_name(when), "world-backup-20260806-153000.zip");
    }

    #[test]
    fn empty_world_dir_is_not_backed_up() {
        let worlds = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let err = backup_dir(worlds.path(), &out.path().join("b.zip")).unwrap_err();
        assert!(matches!(err, Error::NothingToBackup { .. }));
    }

    #[test]
    fn missing_world_dir_is_not_backed_up() {
        let out = tempfile::tempdir().unwrap();
        let err = backup_dir(Path::new("/no/such/worlds"), &out.path().join("b.zip")).unwrap_err();
        assert!(matches!(err, Error::NothingToBackup { .. }));
    }

    #[test]
    fn backup_roundtrips_through_inspect() {
        let worlds = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(worlds.path().join("MSX-World/db")).unwrap();
        std::fs::write(worlds.path().join("MSX-World/level.dat"), b"level").unwrap();
        std::fs::write(worlds.path().join("MSX-World/db/000001.ldb"), b"chunk data").unwrap();

        let out = tempfile::tempdir().unwrap();
        let dest = out.path().join("world-backup.zip");
        let report = backup_dir(worlds.path(), &dest).unwrap();

        assert_eq!(report.entries, 2);
        assert_eq!(report.bytes, 15);

        let listing = crate::inspect(&dest).unwrap();
        assert!(listing.contains_file("level.dat"));
        assert!(listing.contains_file("000001.ldb"));
    }
}
