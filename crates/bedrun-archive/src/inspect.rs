use std::fs::File;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::{Error, Result};

/// Summary of an archive's contents.
#[derive(Clone, Debug)]
pub struct ArchiveReport {
    pub entry_count: usize,
    pub total_bytes: u64,
    pub file_names: Vec<PathBuf>,
}

impl ArchiveReport {
    /// Whether some file entry's final component matches `name`.
    pub fn contains_file(&self, name: &str) -> bool {
        self.file_names
            .iter()
            .any(|p| p.file_name().is_some_and(|f| f == name))
    }

    pub fn require_file(&self, name: &str) -> Result<()> {
        if self.contains_file(name) {
            Ok(())
        } else {
            Err(Error::MissingEntry {
                name: name.to_string(),
            })
        }
    }
}

/// List a zip archive without extracting it.
///
/// Unreadable archives surface as `Corrupted` rather than leaking the zip
/// crate's error type.
pub fn inspect(path: &Path) -> Result<ArchiveReport> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|_| Error::Corrupted)?;

    let mut file_names = Vec::new();
    let mut total_bytes = 0u64;
    let entry_count = archive.len();

    for index in 0..entry_count {
        let entry = archive.by_index(index).map_err(|_| Error::Corrupted)?;
        total_bytes += entry.size();
        if !entry.is_dir()
            && let Some(name) = entry.enclosed_name()
        {
            file_names.push(name);
        }
    }

    Ok(ArchiveReport {
        entry_count,
        total_bytes,
        file_names,
    })
}
