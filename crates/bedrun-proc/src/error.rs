use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: PathBuf,
        source: io::Error,
    },

    #[error("{program} exited during startup with {status}")]
    StartupFailed {
        program: PathBuf,
        status: std::process::ExitStatus,
    },

    #[error("failed to signal child process: {0}")]
    Signal(io::Error),

    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
