use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    /// The `subscribers` directory under the run folder does not exist.
    #[error("batch directory not found: {}", .0.display())]
    BatchDirNotFound(PathBuf),

    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Config validation error (empty column name, empty output file).
    #[error("config validation error: {0}")]
    ConfigValidation(String),

    /// Reading a batch or writing the output table failed.
    #[error("{}: {source}", .file.display())]
    Csv {
        file: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn csv(file: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv { file: file.into(), source }
    }
}
