pub mod types;
pub mod classification;

pub use types::MatchError;
pub use classification::ErrorClassification;
