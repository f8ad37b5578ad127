pub mod tree;
pub mod selector;
pub mod copier;

pub use copier::{copy_atomically, destination_for};
pub use selector::{format_text_block, pick_copy_source, select, MatchReport, RankedMatch};
pub use tree::{enumerate_files, FileMatches, MatchSet, TreeMatcher};
