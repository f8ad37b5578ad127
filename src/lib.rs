//! Match files from a "left" tree of known references against a "right"
//! tree of rescued candidates by line similarity.
//!
//! For every left file, every right file is scored with
//! `2 * common_lines / (left_lines + right_lines)`, where the common lines
//! come from a line diff's edit script. Matches above a threshold are
//! reported best first, and one of them can be copied next to the left
//! file's relative path in an output tree.

pub mod cli;
pub mod config;
pub mod diff;
pub mod errors;
pub mod filters;
pub mod matcher;
pub mod mimetype;
pub mod pipeline;
pub mod similarity;
pub mod utils;
