use std::path::{Path, PathBuf};
use std::sync::Arc;
use dashmap::DashMap;
use tokio::sync::OnceCell;
use crate::errors::MatchError;
use super::sniffer::MimeSniffer;
use tracing::debug;

/// Per-run memo of path -> mimetype.
///
/// Each path gets its own cell, so concurrent lookups of one path share a
/// single sniff. Failed sniffs leave the cell empty and are retried.
pub struct MimetypeCache {
    sniffer: Arc<dyn MimeSniffer>,
    entries: DashMap<PathBuf, Arc<OnceCell<String>>>,
}

impl MimetypeCache {
    pub fn new(sniffer: Arc<dyn MimeSniffer>) -> Self {
        Self {
            sniffer,
            entries: DashMap::new(),
        }
    }

    pub async fn mimetype_of(&self, path: &Path) -> Result<String, MatchError> {
        let cell = self.entries.entry(path.to_path_buf()).or_default().clone();

        let mime = cell
            .get_or_try_init(|| async {
                let mime = self.sniffer.sniff(path).await?;
                debug!(path = %path.display(), mime = %mime, sniffer = self.sniffer.sniffer_name(), "Sniffed mimetype");
                Ok::<_, MatchError>(mime)
            })
            .await?;

        Ok(mime.clone())
    }

    /// Number of paths with a cached answer.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value().initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
