use std::path::Path;
use async_trait::async_trait;
use crate::errors::MatchError;
use super::ed_script::EditOperation;

/// Edit script of a pair together with both files' line counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiff {
    pub operations: Vec<EditOperation>,
    pub left_lines: usize,
    pub right_lines: usize,
}

/// A line-oriented diff collaborator.
///
/// Implementations return the edit script turning `left` into `right`,
/// numbered in the left file's lines.
#[async_trait]
pub trait DiffEngine: Send + Sync {
    async fn line_diff(&self, left: &Path, right: &Path) -> Result<LineDiff, MatchError>;

    /// Verify once, before any work, that every comparison can succeed.
    async fn check_capability(&self) -> Result<(), MatchError> {
        Ok(())
    }

    /// Engine name for logging
    fn engine_name(&self) -> &str;
}

/// Line count of raw bytes: every `\n`, plus an unterminated last line.
pub fn count_raw_lines(data: &[u8]) -> usize {
    let terminated = data.iter().filter(|&&b| b == b'\n').count();
    let unterminated_tail = !data.is_empty() && !data.ends_with(b"\n");
    terminated + usize::from(unterminated_tail)
}
