use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentalDealError {
    #[error("Insufficient data for {field}: {reason}")]
    InsufficientData { field: String, reason: String },

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RentalDealError {
    fn from(e: serde_json::Error) -> Self {
        RentalDealError::SerializationError(e.to_string())
    }
}
