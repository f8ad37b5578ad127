use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;
use crate::errors::MatchError;
use crate::filters::FilterChain;
use crate::pipeline::state::MatchStats;
use crate::similarity::SimilarityScorer;
use tracing::{debug, warn};

/// Right path -> similarity ratio, for one left file.
pub type MatchSet = BTreeMap<PathBuf, f64>;

/// Finished match set of one left file.
#[derive(Debug, Clone)]
pub struct FileMatches {
    pub left: PathBuf,
    pub matches: MatchSet,
}

/// All regular files under `root`, recursively, sorted by file name per
/// directory.
///
/// Every path starts with `root` exactly as given, and names are kept as
/// raw `OsStr`, so undecodable names survive.
pub fn enumerate_files(root: &Path) -> Result<Vec<PathBuf>, MatchError> {
    if !root.is_dir() {
        return Err(MatchError::Config(format!("Not a directory: {}", root.display())));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        match entry {
            // Symlinks count when they point at a regular file
            Ok(entry) if entry.path().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Skipping unreadable entry"),
        }
    }

    debug!(root = %root.display(), files = files.len(), "Enumerated tree");
    Ok(files)
}

/// Scores every left file against every admitted right file.
///
/// Cost is |left| x |right| comparisons; the filter chain is the only thing
/// that prunes it.
pub struct TreeMatcher {
    scorer: Arc<SimilarityScorer>,
    filters: Arc<FilterChain>,
    stats: Arc<MatchStats>,
    cancel_token: CancellationToken,
    jobs: usize,
    quiet: bool,
}

impl TreeMatcher {
    pub fn new(scorer: Arc<SimilarityScorer>, filters: Arc<FilterChain>) -> Self {
        Self {
            scorer,
            filters,
            stats: Arc::new(MatchStats::new()),
            cancel_token: CancellationToken::new(),
            jobs: 1,
            quiet: false,
        }
    }

    /// Maximum concurrent comparisons per left file.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn with_stats(mut self, stats: Arc<MatchStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Suppress per-pair failure diagnostics.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn stats(&self) -> &Arc<MatchStats> {
        &self.stats
    }

    /// One entry per left file, yielded in `left_paths` order as each
    /// finishes. A fatal error ends the stream.
    pub fn matches<'a>(
        &'a self,
        left_paths: Vec<PathBuf>,
        right_paths: Arc<Vec<PathBuf>>,
    ) -> impl Stream<Item = Result<FileMatches, MatchError>> + 'a {
        stream::iter(left_paths).then(move |left| {
            let right_paths = right_paths.clone();
            async move { self.match_file(left, &right_paths).await }
        })
    }

    pub async fn match_file(&self, left: PathBuf, right_paths: &[PathBuf]) -> Result<FileMatches, MatchError> {
        if self.cancel_token.is_cancelled() {
            return Err(MatchError::Interrupted);
        }
        self.stats.record_left_file();

        let scored: Vec<Option<(PathBuf, f64)>> = stream::iter(right_paths)
            .map(|right| self.compare(&left, right))
            .buffer_unordered(self.jobs)
            .try_collect()
            .await?;

        let matches: MatchSet = scored.into_iter().flatten().collect();
        debug!(left = %left.display(), matches = matches.len(), "Left file matched");
        Ok(FileMatches { left, matches })
    }

    /// `Ok(None)` when the pair was filtered or its comparison failed recoverably.
    async fn compare(&self, left: &Path, right: &Path) -> Result<Option<(PathBuf, f64)>, MatchError> {
        if !self.filters.admits(left, right).await {
            self.stats.record_filtered();
            return Ok(None);
        }

        let scored = tokio::select! {
            biased;
            _ = self.cancel_token.cancelled() => return Err(MatchError::Interrupted),
            scored = self.scorer.score(left, right) => scored,
        };

        match scored {
            Ok(ratio) => {
                self.stats.record_comparison();
                Ok(Some((right.to_path_buf(), ratio)))
            }
            Err(e) if e.classify().recoverable => {
                self.stats.record_failure();
                if !self.quiet {
                    let explanation = e
                        .comparison_hint()
                        .map(|hint| format!(" - {}", hint))
                        .unwrap_or_default();
                    warn!(
                        "{} (for files {} and {}){}",
                        e,
                        left.display(),
                        right.display(),
                        explanation
                    );
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
