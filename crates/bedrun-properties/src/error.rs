use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid value '{value}' for key '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
