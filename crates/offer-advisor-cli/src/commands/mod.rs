pub mod analysis;
pub mod compensation;
pub mod income;
