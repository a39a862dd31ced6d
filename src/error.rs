use std::io::Error as IO_ERROR;

use chrono::ParseError as CHRONO_PARSE_ERROR;
use csv::Error as CSV_ERROR;
use sqlx::error::Error as SQL_ERROR;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    SQL(#[from] SQL_ERROR),

    #[error("{0}")]
    Csv(#[from] CSV_ERROR),

    #[error("Field not exists: {0}")]
    FieldNotExist(String),

    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("{0}")]
    ChronoParseError(#[from] CHRONO_PARSE_ERROR),

    #[error("Line {line}: {reason}")]
    MalformedLine { line: u64, reason: String },

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),
}
