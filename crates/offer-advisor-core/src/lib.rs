pub mod advisory;
pub mod compensation;
pub mod competitors;
pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "income")]
pub mod income;

#[cfg(feature = "session")]
pub mod session;

#[cfg(feature = "report")]
pub mod report;

pub use error::OfferAdvisorError;
pub use types::*;

/// Standard result type for all offer-advisor operations
pub type OfferAdvisorResult<T> = Result<T, OfferAdvisorError>;
