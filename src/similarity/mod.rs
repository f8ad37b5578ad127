pub mod scorer;

pub use scorer::{similarity_ratio, SimilarityScorer};
