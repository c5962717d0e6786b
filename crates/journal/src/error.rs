use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, JournalError>;

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("filesystem error: {0}")]
    Fs(#[from] deskfs::Error),

    #[error("corrupt journal record at line {line} of {path}")]
    Corrupt { path: PathBuf, line: usize },
}

impl From<JournalError> for deskfs::Error {
    fn from(err: JournalError) -> Self {
        deskfs::Error::storage(err.to_string())
    }
}
