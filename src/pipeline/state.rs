use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Counters shared by the matcher's concurrent comparisons.
#[derive(Debug, Default)]
pub struct MatchStats {
    left_files: AtomicUsize,
    comparisons: AtomicUsize,
    filtered: AtomicUsize,
    failures: AtomicUsize,
    copied: AtomicUsize,
    copy_failures: AtomicUsize,
}

impl MatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_left_file(&self) {
        self.left_files.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_comparison(&self) {
        self.comparisons.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_copy(&self) {
        self.copied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_copy_failure(&self) {
        self.copy_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self, elapsed: Duration) -> RunSummary {
        RunSummary {
            left_files: self.left_files.load(Ordering::Relaxed),
            comparisons: self.comparisons.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            copied: self.copied.load(Ordering::Relaxed),
            copy_failures: self.copy_failures.load(Ordering::Relaxed),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub left_files: usize,
    pub comparisons: usize,
    pub filtered: usize,
    pub failures: usize,
    pub copied: usize,
    pub copy_failures: usize,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_snapshots_counters() {
        let stats = MatchStats::new();
        stats.record_left_file();
        stats.record_comparison();
        stats.record_comparison();
        stats.record_filtered();
        stats.record_failure();
        stats.record_copy();

        let summary = stats.summary(Duration::from_millis(1500));
        assert_eq!(summary.left_files, 1);
        assert_eq!(summary.comparisons, 2);
        assert_eq!(summary.filtered, 1);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.copied, 1);
        assert_eq!(summary.copy_failures, 0);
        assert_eq!(summary.elapsed_ms, 1500);
    }
}
