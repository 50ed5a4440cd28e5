use thiserror::Error;

use gofinances_domain::AggregationWindowError;

use crate::{format::FormatError, validation::ValidationErrors};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No user is signed in")]
    NotSignedIn,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Malformed stored data: {0}")]
    Schema(String),
    #[error("Stored ledger schema v{found} is newer than supported v{supported}")]
    UnsupportedSchema { found: u64, supported: u32 },
    #[error("Sign-in failed: {0}")]
    Identity(String),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<AggregationWindowError> for CoreError {
    fn from(err: AggregationWindowError) -> Self {
        CoreError::InvalidInput(err.to_string())
    }
}
