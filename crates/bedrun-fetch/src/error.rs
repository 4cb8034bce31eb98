use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("destination {0} has no parent directory")]
    InvalidDestination(PathBuf),

    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("downloaded file is {bytes} bytes, expected at least {min}")]
    TooSmall { bytes: u64, min: u64 },

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("{attempts} attempts failed for {url}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("no download sources configured")]
    NoSources,

    #[error("all {tried} sources failed")]
    AllSourcesFailed {
        tried: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
