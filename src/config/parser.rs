use std::path::Path;
use crate::errors::MatchError;
use super::types::{FileConfig, MatchConfig};

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<FileConfig, MatchError> {
    if !path.exists() {
        return Err(MatchError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(MatchError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    let config: FileConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Reject option combinations that cannot run.
pub fn validate_conflicts(config: &MatchConfig) -> Result<(), MatchError> {
    if config.copy_least_matching && config.copy_dest.is_none() {
        return Err(MatchError::Config(
            "--copy-dest has to be specified for --copy-least-matching to take effect!".into(),
        ));
    }

    if !(0.0..=1.0).contains(&config.min_ratio) {
        return Err(MatchError::Config(format!(
            "--min-ratio must be between 0 and 1, got {}",
            config.min_ratio
        )));
    }

    if config.jobs == 0 {
        return Err(MatchError::Config("--jobs must be at least 1".into()));
    }

    if config.timeout.is_some_and(|t| t.is_zero()) {
        return Err(MatchError::Config("--timeout must be positive".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_least_matching_requires_copy_dest() {
        let mut config = MatchConfig::new("l", "r");
        config.copy_least_matching = true;
        let err = validate_conflicts(&config).unwrap_err();
        assert!(matches!(err, MatchError::Config(_)));
        assert!(err.to_string().contains("--copy-dest"));

        config.copy_dest = Some(PathBuf::from("out"));
        assert!(validate_conflicts(&config).is_ok());
    }

    #[test]
    fn test_min_ratio_out_of_range() {
        let mut config = MatchConfig::new("l", "r");
        config.min_ratio = 1.5;
        assert!(validate_conflicts(&config).is_err());
        config.min_ratio = f64::NAN;
        assert!(validate_conflicts(&config).is_err());
        config.min_ratio = 1.0;
        assert!(validate_conflicts(&config).is_ok());
    }

    #[test]
    fn test_zero_jobs_and_timeout_rejected() {
        let mut config = MatchConfig::new("l", "r");
        config.jobs = 0;
        assert!(validate_conflicts(&config).is_err());

        let mut config = MatchConfig::new("l", "r");
        config.timeout = Some(Duration::ZERO);
        assert!(validate_conflicts(&config).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_conflicts(&MatchConfig::new("l", "r")).is_ok());
    }

    #[tokio::test]
    async fn test_parse_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rescue.yaml");
        std::fs::write(&path, "min_ratio: 0.5\njobs: 2\ntimeout_secs: 30\n").unwrap();

        let parsed = parse_config(&path).await.unwrap();
        assert_eq!(parsed.min_ratio, Some(0.5));
        assert_eq!(parsed.jobs, Some(2));
        assert_eq!(parsed.timeout_secs, Some(30));
    }

    #[tokio::test]
    async fn test_parse_missing_config() {
        let err = parse_config(Path::new("/nonexistent/rescue.yaml")).await.unwrap_err();
        assert!(matches!(err, MatchError::Config(_)));
    }

    #[tokio::test]
    async fn test_parse_empty_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert!(parse_config(&path).await.unwrap().min_ratio.is_none());
    }

    #[tokio::test]
    async fn test_parse_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "min_ratio: [not, a, number]\n").unwrap();
        assert!(matches!(parse_config(&path).await, Err(MatchError::Yaml(_))));
    }
}
