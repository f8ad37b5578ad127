use std::path::Path;
use std::sync::Arc;
use crate::mimetype::MimetypeCache;
use tracing::{debug, warn};

/// A pre-match predicate over a (left, right) pair.
pub enum FilterPredicate {
    /// Both files sniff to the same mimetype.
    MimetypeEquals(Arc<MimetypeCache>),
}

impl FilterPredicate {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MimetypeEquals(_) => "mimetype-equals",
        }
    }

    pub async fn admits(&self, left: &Path, right: &Path) -> bool {
        match self {
            Self::MimetypeEquals(cache) => {
                let (left_mime, right_mime) =
                    tokio::join!(cache.mimetype_of(left), cache.mimetype_of(right));
                match (left_mime, right_mime) {
                    (Ok(l), Ok(r)) => l == r,
                    // Only prune what can be judged
                    (Err(e), _) | (_, Err(e)) => {
                        warn!(error = %e, "Mimetype unknown, comparing anyway");
                        true
                    }
                }
            }
        }
    }
}

/// Conjunction of predicates, fixed before matching starts.
#[derive(Default)]
pub struct FilterChain {
    predicates: Vec<FilterPredicate>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate; put cheap, likely-rejecting ones first.
    pub fn with(mut self, predicate: FilterPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub async fn admits(&self, left: &Path, right: &Path) -> bool {
        for predicate in &self.predicates {
            if !predicate.admits(left, right).await {
                debug!(
                    filter = predicate.name(),
                    left = %left.display(),
                    right = %right.display(),
                    "Pair filtered"
                );
                return false;
            }
        }
        true
    }
}
