//! Error types for the local provider

use landingzone::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocalError {
    #[error("State file version {found} is newer than supported version {supported}")]
    UnsupportedStateVersion { found: u32, supported: u32 },

    #[error("State is locked by {holder} since {since}")]
    Locked { holder: String, since: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<LocalError> for CloudError {
    fn from(err: LocalError) -> Self {
        match err {
            LocalError::Io(e) => CloudError::Io(e),
            LocalError::Json(e) => CloudError::Json(e),
            other => CloudError::ApiError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocalError>;
