use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CurateError>;

/// Classified failures of a curation run. Every variant here is fatal for
/// the run that raised it; field-level parse failures are not errors, they
/// become invalid markers counted in provenance.
#[derive(Debug, Error)]
pub enum CurateError {
    /// A required key column is absent from a fixed-schema source.
    #[error("table `{table}`: required column `{column}` is missing")]
    Schema { table: String, column: String },

    /// A file name does not yield a usable subject key.
    #[error("cannot infer a subject key from `{}`", .path.display())]
    KeyInference { path: PathBuf },

    /// A domain invariant does not hold after cleaning.
    #[error("table `{table}`: {message}")]
    Integrity { table: String, message: String },

    #[error("i/o failure on `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed delimited data in `{}`", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid configuration `{}`", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid discovery pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl CurateError {
    pub fn schema(table: &str, column: &str) -> Self {
        CurateError::Schema {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub fn integrity(table: &str, message: impl Into<String>) -> Self {
        CurateError::Integrity {
            table: table.to_string(),
            message: message.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        CurateError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn malformed(path: impl AsRef<Path>, source: csv::Error) -> Self {
        CurateError::Malformed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
