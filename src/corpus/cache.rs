use std::sync::Arc;
use std::time::{Duration, Instant};

use super::source::{self, DataSource};
use super::Corpus;
use crate::error::Result;

/// Keeps the last loaded corpus and reloads it once the staleness window expires.
///
/// The data is never mutated in place: a refresh swaps in a new snapshot while
/// callers holding the old `Arc` keep reading the old one.
pub struct CorpusCache {
    source: DataSource,
    ttl: Duration,
    snapshot: Option<Snapshot>,
}

struct Snapshot {
    loaded_at: Instant,
    corpus: Arc<Corpus>,
}

impl CorpusCache {
    pub fn new(source: DataSource, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            snapshot: None,
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Whether the next `get` will hit the data source
    pub fn is_stale(&self) -> bool {
        self.snapshot
            .as_ref()
            .is_none_or(|s| s.loaded_at.elapsed() >= self.ttl)
    }

    /// Current snapshot, reloading it first if it is missing or stale
    pub async fn get(&mut self) -> Result<Arc<Corpus>> {
        if !self.is_stale()
            && let Some(snapshot) = &self.snapshot
        {
            return Ok(Arc::clone(&snapshot.corpus));
        }

        if self.snapshot.is_some() {
            tracing::info!("Corpus snapshot expired, reloading from {}", self.source);
        }
        let corpus = Arc::new(source::load(&self.source).await?);
        self.snapshot = Some(Snapshot {
            loaded_at: Instant::now(),
            corpus: Arc::clone(&corpus),
        });
        Ok(corpus)
    }

    /// Force a reload on the next `get`
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const ONE_DOC: &str = "doc_id,title,sent_id,sent,links\na,Alpha,0,First.,\n";
    const TWO_DOCS: &str = "doc_id,title,sent_id,sent,links\na,Alpha,0,First.,\nb,Beta,0,Second.,\n";

    #[tokio::test]
    async fn test_snapshot_reused_within_window() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, ONE_DOC).unwrap();

        let mut cache = CorpusCache::new(DataSource::File(path.clone()), Duration::from_secs(600));
        let first = cache.get().await.unwrap();
        fs::write(&path, TWO_DOCS).unwrap();
        let second = cache.get().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_snapshot_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, ONE_DOC).unwrap();

        let mut cache = CorpusCache::new(DataSource::File(path.clone()), Duration::ZERO);
        let first = cache.get().await.unwrap();
        fs::write(&path, TWO_DOCS).unwrap();
        assert!(cache.is_stale());
        let second = cache.get().await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, ONE_DOC).unwrap();

        let mut cache = CorpusCache::new(DataSource::File(path.clone()), Duration::from_secs(600));
        cache.get().await.unwrap();
        assert!(!cache.is_stale());
        cache.invalidate();
        assert!(cache.is_stale());
    }
}
