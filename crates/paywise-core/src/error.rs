use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaywiseError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PaywiseError {
    fn from(e: serde_json::Error) -> Self {
        PaywiseError::SerializationError(e.to_string())
    }
}
