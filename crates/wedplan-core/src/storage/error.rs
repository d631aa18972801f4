use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read stored data for {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write stored data for {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Storage quota exceeded for {key}: {size} bytes needed, {quota} allowed")]
    QuotaExceeded { key: String, size: u64, quota: u64 },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No data directory available")]
    NoDataDir,
}

impl StorageError {
    /// Short message for the status bar.
    pub fn notice_text(&self) -> String {
        match self {
            StorageError::QuotaExceeded { .. } => "storage is full".to_string(),
            StorageError::Read { source, .. } | StorageError::Write { source, .. } => {
                source.to_string()
            }
            StorageError::Serialize(e) => e.to_string(),
            StorageError::NoDataDir => "no data directory".to_string(),
        }
    }
}
