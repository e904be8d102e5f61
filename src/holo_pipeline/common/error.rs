use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoloError {
    #[error("Truncated record in {path}: need {needed} bytes, file has {available}")]
    TruncatedRecord {
        path: PathBuf,
        needed: u64,
        available: u64,
    },

    #[error("Invalid directory: {0}")]
    InvalidDirectory(PathBuf),

    #[error("No valid files in {directory} ({failures} failed)")]
    EmptyBatch { directory: PathBuf, failures: usize },

    #[error("Malformed table: {0}")]
    MalformedTable(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HoloError>;
