use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{} not found or not a {kind}", .path.display())]
    PathNotFound { path: PathBuf, kind: &'static str },

    #[error("malformed conditions file {} (line {line}, column {column}): {message}", .path.display())]
    MalformedConditions {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{table} table is missing column '{column}'")]
    MissingColumn { table: &'static str, column: &'static str },

    #[error("{table} table row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        table: &'static str,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("failed to read {table} table: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write spreadsheet {}: {source}", .path.display())]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("failed to render manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}
