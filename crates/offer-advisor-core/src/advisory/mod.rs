//! Offer recommendation and the risk rules evaluated against it.

pub mod recommend;
pub mod risk;

pub use recommend::{apply_suggestion, recommend, AdviseParams, SuggestedField, Suggestion};
pub use risk::{advise, advise_full, Advisory, AdvisoryCode, Severity};
