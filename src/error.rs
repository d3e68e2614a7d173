use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lexicon error: {0}")]
    Lexicon(#[from] fst::Error),

    #[error("failed to read table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed model file {path}: {message}")]
    ModelFormat { path: PathBuf, message: String },

    #[error("scorer `{tag}` failed: {message}")]
    Scorer { tag: String, message: String },

    #[error("invalid scorer input: {0}")]
    InvalidInput(String),

    #[error("scorer returned {got} rows for a batch of {expected}")]
    Shape { expected: usize, got: usize },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
