//! Session state threaded through pure transitions: one [`SessionEdit`] in,
//! one new [`SessionState`] out, with [`analyze`] recomputing every derived
//! figure from scratch.

pub mod analysis;
pub mod edit;
pub mod state;

pub use analysis::{analyze, analyze_offer, OfferAnalysis};
pub use edit::{apply, Party, SessionEdit};
pub use state::{CandidateProfile, SessionState};
