//! FILENAME: core/ingest/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("filter config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("schema error: {0}")]
    Schema(#[from] table::SchemaError),
}
