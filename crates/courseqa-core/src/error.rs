// crates/courseqa-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("missing required columns: {}", .0.join(", "))]
    Schema(Vec<String>),

    #[error("column '{column}' has unparseable value '{value}'")]
    Parse { column: String, value: String },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data processing error: {0}")]
    Processing(String),
}

impl PipelineError {
    pub fn parse(column: impl Into<String>, value: impl Into<String>) -> Self {
        PipelineError::Parse {
            column: column.into(),
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
