//! Error types for the gconv CLI.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// File could not be opened, read or created.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decoding, transforming or encoding failed.
    #[error("{}: {source}", path.display())]
    Convert {
        path: PathBuf,
        #[source]
        source: gconv_core::Error,
    },

    /// Input and output name the same file.
    #[error("input and output are the same file: {}", .0.display())]
    SameFile(PathBuf),
}

impl CliError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn convert(path: &Path, source: gconv_core::Error) -> Self {
        CliError::Convert {
            path: path.to_path_buf(),
            source,
        }
    }
}
