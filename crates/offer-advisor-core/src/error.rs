use thiserror::Error;

#[derive(Debug, Error)]
pub enum OfferAdvisorError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Competitor not found: no competitor with id {id}")]
    CompetitorNotFound { id: u32 },

    #[error("Tax table is not monotonic at bracket {index}")]
    NonMonotonicTaxTable { index: usize },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for OfferAdvisorError {
    fn from(e: serde_json::Error) -> Self {
        OfferAdvisorError::SerializationError(e.to_string())
    }
}
