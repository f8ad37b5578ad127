use std::io::Write;
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;
use std::time::Instant;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use crate::config::{validate_conflicts, MatchConfig, OutputFormat};
use crate::diff::create_engine;
use crate::errors::MatchError;
use crate::filters::{FilterChain, FilterPredicate};
use crate::matcher::{
    copy_atomically, destination_for, enumerate_files, format_text_block, pick_copy_source, select,
    FileMatches, MatchReport, RankedMatch, TreeMatcher,
};
use crate::mimetype::{create_sniffer, MimetypeCache};
use crate::similarity::SimilarityScorer;
use crate::utils::formatting::format_elapsed;
use super::state::{MatchStats, RunSummary};
use tracing::{error, info};

/// Drives one run: enumerate both trees, stream per-left-file matches,
/// print the qualifying ones and copy the chosen right file.
pub struct MatchOrchestrator {
    config: MatchConfig,
    matcher: TreeMatcher,
    stats: Arc<MatchStats>,
    cancel_token: CancellationToken,
}

impl MatchOrchestrator {
    /// Validate the configuration and the diff collaborator before any work.
    pub async fn new(config: MatchConfig) -> Result<Self, MatchError> {
        validate_conflicts(&config)?;

        let engine = create_engine(config.diff_engine, &config.diff_program);
        engine.check_capability().await?;
        info!(engine = engine.engine_name(), jobs = config.jobs, "Diff engine ready");

        let scorer = Arc::new(SimilarityScorer::new(engine).with_timeout(config.timeout));
        let filters = Arc::new(build_filter_chain(&config));
        let stats = Arc::new(MatchStats::new());
        let cancel_token = CancellationToken::new();

        let matcher = TreeMatcher::new(scorer, filters)
            .with_jobs(config.jobs)
            .with_quiet(config.quiet)
            .with_stats(stats.clone())
            .with_cancel_token(cancel_token.clone());

        Ok(Self {
            config,
            matcher,
            stats,
            cancel_token,
        })
    }

    /// Replace the cancel token with an external one (e.g. wired to Ctrl-C).
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.matcher = self.matcher.with_cancel_token(token.clone());
        self.cancel_token = token;
        self
    }

    /// Write one block per left file with a qualifying match to `out`.
    pub async fn run<W: Write + Send>(&self, out: &mut W) -> Result<RunSummary, MatchError> {
        let started = Instant::now();

        let left_paths = enumerate_files(&self.config.left_tree)?;
        let right_paths = Arc::new(enumerate_files(&self.config.right_tree)?);
        info!(
            left_tree = %self.config.left_tree.display(),
            right_tree = %self.config.right_tree.display(),
            left_files = left_paths.len(),
            right_files = right_paths.len(),
            max_comparisons = left_paths.len() * right_paths.len(),
            "Matching trees"
        );

        let mut results = pin!(self.matcher.matches(left_paths, right_paths));
        while let Some(file_matches) = results.next().await {
            self.emit(&file_matches?, out).await?;
        }

        let elapsed = started.elapsed();
        let summary = self.stats.summary(elapsed);
        info!(
            left_files = summary.left_files,
            comparisons = summary.comparisons,
            filtered = summary.filtered,
            failures = summary.failures,
            copied = summary.copied,
            copy_failures = summary.copy_failures,
            elapsed = %format_elapsed(elapsed),
            "Matching complete"
        );
        Ok(summary)
    }

    async fn emit<W: Write + Send>(&self, file_matches: &FileMatches, out: &mut W) -> Result<(), MatchError> {
        let selected = select(&file_matches.matches, self.config.min_ratio);
        if selected.is_empty() {
            return Ok(());
        }

        let copied = self.copy_selected(&file_matches.left, &selected).await;

        let block = match self.config.format {
            OutputFormat::Text => format_text_block(&file_matches.left, &selected),
            OutputFormat::Json => MatchReport {
                left: &file_matches.left,
                matches: &selected,
                copied: copied.as_deref(),
            }
            .to_json_line()?,
        };

        // One write per block keeps blocks whole
        out.write_all(block.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Copy failures are logged and counted; the run continues.
    async fn copy_selected(&self, left: &Path, selected: &[RankedMatch]) -> Option<PathBuf> {
        let copy_dest = self.config.copy_dest.as_ref()?;
        let source = pick_copy_source(selected, self.config.copy_least_matching)?;
        if self.cancel_token.is_cancelled() {
            return None;
        }

        let copied = async {
            let dest = destination_for(copy_dest, &self.config.left_tree, left)?;
            copy_atomically(&source.right, &dest).await?;
            Ok::<_, MatchError>(dest)
        };
        match copied.await {
            Ok(dest) => {
                self.stats.record_copy();
                Some(dest)
            }
            Err(e) => {
                self.stats.record_copy_failure();
                error!(left = %left.display(), error = %e, "Copy failed");
                None
            }
        }
    }
}

fn build_filter_chain(config: &MatchConfig) -> FilterChain {
    let mut chain = FilterChain::new();
    if config.mimetype_filter {
        let cache = Arc::new(MimetypeCache::new(create_sniffer(config.mime_sniffer)));
        chain = chain.with(FilterPredicate::MimetypeEquals(cache));
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEngineKind;
    use crate::mimetype::MimeSnifferKind;
    use tempfile::TempDir;

    fn builtin_config(left: &Path, right: &Path) -> MatchConfig {
        let mut config = MatchConfig::new(left, right);
        config.diff_engine = DiffEngineKind::Builtin;
        config.mime_sniffer = MimeSnifferKind::Builtin;
        config.jobs = 2;
        config
    }

    #[test]
    fn test_filter_chain_follows_config() {
        let mut config = MatchConfig::new("l", "r");
        assert!(build_filter_chain(&config).is_empty());
        config.mimetype_filter = true;
        assert_eq!(build_filter_chain(&config).len(), 1);
    }

    #[tokio::test]
    async fn test_new_rejects_conflicting_options() {
        let mut config = MatchConfig::new("l", "r");
        config.copy_least_matching = true;
        let err = MatchOrchestrator::new(config).await.err().unwrap();
        assert!(matches!(err, MatchError::Config(_)));
    }

    #[tokio::test]
    async fn test_new_rejects_incapable_diff() {
        let mut config = MatchConfig::new("l", "r");
        config.diff_program = PathBuf::from("/nonexistent/diff");
        let err = MatchOrchestrator::new(config).await.err().unwrap();
        assert!(matches!(err, MatchError::CollaboratorCapability(_)));
    }

    #[tokio::test]
    async fn test_left_files_without_matches_print_nothing() {
        let dir = TempDir::new().unwrap();
        let (left, right) = (dir.path().join("l"), dir.path().join("r"));
        std::fs::create_dir_all(&left).unwrap();
        std::fs::create_dir_all(&right).unwrap();
        std::fs::write(left.join("a"), "a\nb\n").unwrap();
        std::fs::write(left.join("b"), "q\n").unwrap();
        std::fs::write(right.join("x"), "a\nb\n").unwrap();

        let mut config = builtin_config(&left, &right);
        config.min_ratio = 0.5;
        let orchestrator = MatchOrchestrator::new(config).await.unwrap();
        let mut out = Vec::new();
        let summary = orchestrator.run(&mut out).await.unwrap();

        let expected = format!("{}\n  1.0000 {}\n", left.join("a").display(), right.join("x").display());
        assert_eq!(String::from_utf8(out).unwrap(), expected);
        assert_eq!(summary.left_files, 2);
        assert_eq!(summary.comparisons, 2);
    }

    #[tokio::test]
    async fn test_cancelled_run_is_interrupted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("f"), "x\n").unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let orchestrator = MatchOrchestrator::new(builtin_config(dir.path(), dir.path()))
            .await
            .unwrap()
            .with_cancel_token(token);

        let mut out = Vec::new();
        let err = orchestrator.run(&mut out).await.unwrap_err();
        assert!(matches!(err, MatchError::Interrupted));
        assert!(out.is_empty());
    }
}
