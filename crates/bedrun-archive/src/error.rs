use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive is corrupted or not a zip file")]
    Corrupted,

    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("entry path is absolute or escapes the archive root")]
    InvalidPath,

    #[error("archive does not contain the required entry '{name}'")]
    MissingEntry { name: String },

    #[error("nothing to back up: {path} is missing or empty")]
    NothingToBackup { path: PathBuf },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
