use std::path::Path;
use async_trait::async_trait;
use similar::{capture_diff_slices, Algorithm, DiffOp};
use crate::errors::MatchError;
use super::ed_script::{EditKind, EditOperation};
use super::engine::{count_raw_lines, DiffEngine, LineDiff};
use tracing::debug;

/// How far into a file to look for NUL bytes when deciding it is binary.
pub const BINARY_SNIFF_LEN: usize = 8192;

/// Exit status a line diff reports for trouble, binary input included.
const TROUBLE_CODE: i32 = 2;

/// In-process Myers line diff.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinDiff;

impl BuiltinDiff {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DiffEngine for BuiltinDiff {
    async fn line_diff(&self, left: &Path, right: &Path) -> Result<LineDiff, MatchError> {
        let (left_bytes, right_bytes) = tokio::try_join!(tokio::fs::read(left), tokio::fs::read(right))
            .map_err(|e| {
                debug!(left = %left.display(), right = %right.display(), error = %e, "Failed to read pair");
                MatchError::ComparisonFailed { code: Some(TROUBLE_CODE) }
            })?;

        tokio::task::spawn_blocking(move || {
            Ok::<_, MatchError>(LineDiff {
                operations: diff_bytes(&left_bytes, &right_bytes)?,
                left_lines: count_raw_lines(&left_bytes),
                right_lines: count_raw_lines(&right_bytes),
            })
        })
        .await
        .map_err(|_| MatchError::ComparisonFailed { code: None })?
    }

    fn engine_name(&self) -> &str {
        "builtin"
    }
}

/// Split raw bytes into lines, keeping each `\n` terminator.
pub fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    data.split_inclusive(|b| *b == b'\n').collect()
}

pub fn is_binary(data: &[u8]) -> bool {
    data[..data.len().min(BINARY_SNIFF_LEN)].contains(&0)
}

/// Edit script turning `left` into `right`.
pub fn diff_bytes(left: &[u8], right: &[u8]) -> Result<Vec<EditOperation>, MatchError> {
    if left == right {
        return Ok(Vec::new());
    }
    if is_binary(left) || is_binary(right) {
        return Err(MatchError::ComparisonFailed { code: Some(TROUBLE_CODE) });
    }

    let old = split_lines(left);
    let new = split_lines(right);

    let ops = capture_diff_slices(Algorithm::Myers, &old, &new)
        .into_iter()
        .filter_map(|op| match op {
            DiffOp::Equal { .. } => None,
            DiffOp::Delete { old_index, old_len, .. } => {
                Some(left_range(EditKind::Delete, old_index, old_len))
            }
            DiffOp::Replace { old_index, old_len, .. } => {
                Some(left_range(EditKind::Change, old_index, old_len))
            }
            // `Na` appends after left line N; N is 0 before the first line
            DiffOp::Insert { old_index, .. } => {
                Some(EditOperation::new(EditKind::Insert, old_index, None))
            }
        })
        .collect();

    Ok(ops)
}

fn left_range(kind: EditKind, old_index: usize, old_len: usize) -> EditOperation {
    let start = old_index + 1;
    let end = if old_len > 1 { Some(old_index + old_len) } else { None };
    EditOperation::new(kind, start, end)
}
