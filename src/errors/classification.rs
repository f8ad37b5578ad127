use super::types::MatchError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub recoverable: bool,
}

impl MatchError {
    /// Classify this error to determine whether the run may continue past it.
    ///
    /// Recoverable errors are scoped to one pair (comparison, sniff) or one
    /// left file (copy). Everything else halts the run.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Per-pair / per-file failures
            MatchError::ComparisonFailed { .. } => ErrorClassification {
                error_type: "ComparisonFailed",
                recoverable: true,
            },
            MatchError::ComparisonTimedOut(_) => ErrorClassification {
                error_type: "ComparisonTimedOut",
                recoverable: true,
            },
            MatchError::SniffFailed { .. } => ErrorClassification {
                error_type: "SniffFailed",
                recoverable: true,
            },
            MatchError::CopyFailed { .. } => ErrorClassification {
                error_type: "CopyFailed",
                recoverable: true,
            },

            // Fatal
            MatchError::Config(_) => ErrorClassification {
                error_type: "ConfigurationError",
                recoverable: false,
            },
            MatchError::CollaboratorCapability(_) => ErrorClassification {
                error_type: "CollaboratorCapabilityError",
                recoverable: false,
            },
            MatchError::MalformedEditHeader(_) => ErrorClassification {
                error_type: "MalformedEditHeader",
                recoverable: false,
            },
            MatchError::Interrupted => ErrorClassification {
                error_type: "Interrupted",
                recoverable: false,
            },
            MatchError::Io(_) => ErrorClassification {
                error_type: "IoError",
                recoverable: false,
            },
            MatchError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                recoverable: false,
            },
            MatchError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                recoverable: false,
            },
        }
    }

    /// Process exit code for an error that ended the run.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
