//! Error types for loading and querying gradebook data.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the gradebook tables or answering a query.
#[derive(Error, Debug)]
pub enum GradebookError {
    /// A file or directory could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be parsed.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The same identifier appears twice in one table.
    #[error("{}:{line}: duplicate {kind} identifier '{id}'", path.display())]
    DuplicateId {
        path: PathBuf,
        line: usize,
        kind: &'static str,
        id: String,
    },

    /// A submission references an assignment that is not in the table
    /// (only raised under the strict policy).
    #[error("Submission by '{student_id}' references unknown assignment '{assignment_id}'")]
    UnknownAssignment {
        student_id: String,
        assignment_id: String,
    },

    /// Invalid configuration value.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl GradebookError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GradebookError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        GradebookError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GradebookError>;
