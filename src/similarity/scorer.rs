use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use crate::diff::ed_script::deleted_lines;
use crate::diff::DiffEngine;
use crate::errors::MatchError;
use tracing::trace;

/// Scores a (left, right) pair as `2 * common / (left_lines + right_lines)`,
/// where `common` is the number of left lines the edit script keeps.
pub struct SimilarityScorer {
    engine: Arc<dyn DiffEngine>,
    timeout: Option<Duration>,
}

impl SimilarityScorer {
    pub fn new(engine: Arc<dyn DiffEngine>) -> Self {
        Self { engine, timeout: None }
    }

    /// Bound every diff invocation; a comparison over the limit fails on its own.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn score(&self, left: &Path, right: &Path) -> Result<f64, MatchError> {
        let diff = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.engine.line_diff(left, right))
                .await
                .map_err(|_| MatchError::ComparisonTimedOut(limit.as_secs()))??,
            None => self.engine.line_diff(left, right).await?,
        };
        let deleted = deleted_lines(&diff.operations);

        let ratio = similarity_ratio(diff.left_lines, diff.right_lines, deleted);
        trace!(
            left = %left.display(),
            right = %right.display(),
            ops = diff.operations.len(),
            deleted,
            left_lines = diff.left_lines,
            right_lines = diff.right_lines,
            ratio,
            "Scored pair"
        );
        Ok(ratio)
    }
}

/// Two empty files count as identical.
pub fn similarity_ratio(left_lines: usize, right_lines: usize, deleted: usize) -> f64 {
    let total = left_lines + right_lines;
    if total == 0 {
        return 1.0;
    }
    let common = left_lines.saturating_sub(deleted);
    (2.0 * common as f64 / total as f64).clamp(0.0, 1.0)
}
