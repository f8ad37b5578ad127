use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Diff collaborator unusable: {0}")]
    CollaboratorCapability(String),

    #[error("Tried to parse invalid ed script line number header: {0:?}")]
    MalformedEditHeader(String),

    #[error("Got bad return code {} from diff", display_code(.code))]
    ComparisonFailed { code: Option<i32> },

    #[error("Comparison timed out after {0}s")]
    ComparisonTimedOut(u64),

    #[error("Could not determine mimetype of {}: {reason}", .path.display())]
    SniffFailed { path: PathBuf, reason: String },

    #[error("Could not copy {} to {}: {reason}", .src.display(), .dest.display())]
    CopyFailed {
        src: PathBuf,
        dest: PathBuf,
        reason: String,
    },

    #[error("Interrupted")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none (terminated by signal or not started)".to_string(),
    }
}

impl MatchError {
    /// Hint printed next to a failed comparison. Exit code 2 from a line
    /// diff usually means one side is binary, though nothing guarantees it.
    pub fn comparison_hint(&self) -> Option<&'static str> {
        match self {
            MatchError::ComparisonFailed { code: Some(2) } => {
                Some("perhaps the files are binary files")
            }
            _ => None,
        }
    }
}
