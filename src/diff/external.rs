use std::path::{Path, PathBuf};
use std::process::Stdio;
use async_trait::async_trait;
use tokio::process::Command;
use crate::errors::MatchError;
use super::ed_script::{parse_script, EditOperation};
use super::engine::{count_raw_lines, DiffEngine, LineDiff};
use tracing::debug;

/// Output mode that prints only the ed hunk headers, without line content.
pub const ED_LINE_NUMBERS_ONLY: &str = "--ed-line-numbers-only";

/// Runs a diff binary that supports [`ED_LINE_NUMBERS_ONLY`].
pub struct ExternalDiff {
    program: PathBuf,
}

impl ExternalDiff {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    async fn run_diff(&self, left: &Path, right: &Path) -> Result<Vec<EditOperation>, MatchError> {
        let output = Command::new(&self.program)
            .arg(ED_LINE_NUMBERS_ONLY)
            .arg(left)
            .arg(right)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                debug!(program = %self.program.display(), error = %e, "Failed to spawn diff");
                MatchError::ComparisonFailed { code: None }
            })?;

        match output.status.code() {
            // 0: no differences, 1: differences found
            Some(0) | Some(1) => parse_script(&String::from_utf8_lossy(&output.stdout)),
            code => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                debug!(
                    left = %left.display(),
                    right = %right.display(),
                    stderr = %stderr.trim(),
                    "diff reported trouble"
                );
                Err(MatchError::ComparisonFailed { code })
            }
        }
    }
}

async fn count_lines(path: &Path) -> Result<usize, MatchError> {
    let data = tokio::fs::read(path).await.map_err(|e| {
        debug!(path = %path.display(), error = %e, "Failed to count lines");
        MatchError::ComparisonFailed { code: None }
    })?;
    Ok(count_raw_lines(&data))
}

#[async_trait]
impl DiffEngine for ExternalDiff {
    async fn line_diff(&self, left: &Path, right: &Path) -> Result<LineDiff, MatchError> {
        let (operations, left_lines, right_lines) =
            tokio::try_join!(self.run_diff(left, right), count_lines(left), count_lines(right))?;
        Ok(LineDiff { operations, left_lines, right_lines })
    }

    async fn check_capability(&self) -> Result<(), MatchError> {
        let hint = "Set the DIFF environment variable to a diff binary that supports this option.";

        let output = Command::new(&self.program)
            .arg("--help")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| MatchError::CollaboratorCapability(format!(
                "cannot run {}: {}. {}",
                self.program.display(), e, hint
            )))?;

        let help = String::from_utf8_lossy(&output.stdout);
        if !help.contains(ED_LINE_NUMBERS_ONLY) {
            return Err(MatchError::CollaboratorCapability(format!(
                "{} lacks {} option! {}",
                self.program.display(), ED_LINE_NUMBERS_ONLY, hint
            )));
        }

        debug!(program = %self.program.display(), "diff supports line-numbers-only output");
        Ok(())
    }

    fn engine_name(&self) -> &str {
        "external"
    }
}
