use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create data directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("data directory {path} is not writable: {source}")]
    NotWritable { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
