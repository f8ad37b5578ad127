pub mod parser;
pub mod types;

pub use types::*;
pub use parser::{parse_config, validate_conflicts};
