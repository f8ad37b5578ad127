use std::path::PathBuf;
use std::time::Duration;
use serde::Deserialize;
use crate::diff::DiffEngineKind;
use crate::mimetype::MimeSnifferKind;

/// Options accepted from a YAML config file; CLI flags override them.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileConfig {
    pub min_ratio: Option<f64>,
    pub mimetype_filter: Option<bool>,
    pub copy_dest: Option<PathBuf>,
    pub copy_least_matching: Option<bool>,
    pub jobs: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub diff_engine: Option<DiffEngineKind>,
    pub diff_program: Option<PathBuf>,
    pub mime_sniffer: Option<MimeSnifferKind>,
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_DIFF_PROGRAM: &str = "diff";

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub left_tree: PathBuf,
    pub right_tree: PathBuf,
    pub min_ratio: f64,
    pub mimetype_filter: bool,
    pub copy_dest: Option<PathBuf>,
    pub copy_least_matching: bool,
    pub jobs: usize,
    pub timeout: Option<Duration>,
    pub diff_engine: DiffEngineKind,
    pub diff_program: PathBuf,
    pub mime_sniffer: MimeSnifferKind,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl MatchConfig {
    pub fn new(left_tree: impl Into<PathBuf>, right_tree: impl Into<PathBuf>) -> Self {
        Self {
            left_tree: left_tree.into(),
            right_tree: right_tree.into(),
            min_ratio: 0.0,
            mimetype_filter: false,
            copy_dest: None,
            copy_least_matching: false,
            jobs: default_jobs(),
            timeout: None,
            diff_engine: DiffEngineKind::default(),
            diff_program: PathBuf::from(DEFAULT_DIFF_PROGRAM),
            mime_sniffer: MimeSnifferKind::default(),
            format: OutputFormat::default(),
            quiet: false,
        }
    }
}

pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_config_defaults() {
        let config = MatchConfig::new("known", "rescue");
        assert_eq!(config.min_ratio, 0.0);
        assert!(!config.mimetype_filter);
        assert!(config.copy_dest.is_none());
        assert!(!config.copy_least_matching);
        assert!(config.jobs >= 1);
        assert_eq!(config.diff_engine, DiffEngineKind::External);
        assert_eq!(config.diff_program, PathBuf::from("diff"));
        assert_eq!(config.mime_sniffer, MimeSnifferKind::File);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_file_config_deserialize() {
        let yaml = "min_ratio: 0.7\nmimetype_filter: true\ncopy_dest: out\ndiff_engine: builtin\nmime_sniffer: builtin\nformat: json\n";
        let parsed: FileConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.min_ratio, Some(0.7));
        assert_eq!(parsed.mimetype_filter, Some(true));
        assert_eq!(parsed.copy_dest, Some(PathBuf::from("out")));
        assert_eq!(parsed.diff_engine, Some(DiffEngineKind::Builtin));
        assert_eq!(parsed.mime_sniffer, Some(MimeSnifferKind::Builtin));
        assert_eq!(parsed.format, Some(OutputFormat::Json));
        assert!(parsed.jobs.is_none());
    }

    #[test]
    fn test_file_config_default_is_empty() {
        let config = FileConfig::default();
        assert!(config.min_ratio.is_none());
        assert!(config.copy_dest.is_none());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
