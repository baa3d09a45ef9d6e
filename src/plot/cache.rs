use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::formula::{ParseFailure, ParserConfig};
use crate::sample::Series;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    formula: String,
    config_json: String,
}

type Cell = Arc<OnceLock<Result<Arc<Series>, ParseFailure>>>;

/// LRU cache of sampled series, keyed by formula and parser settings.
///
/// Safe to share between threads. Each key is computed at most once while it
/// stays resident; concurrent callers for the same key wait for the first.
pub struct SeriesCache {
    entries: Mutex<LruCache<CacheKey, Cell>>,
}

impl SeriesCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    /// Return the cached outcome for `formula` under `config`, running
    /// `compute` if there is none yet.
    pub fn get_or_compute<F>(
        &self,
        formula: &str,
        config: &ParserConfig,
        compute: F,
    ) -> Result<Arc<Series>, ParseFailure>
    where
        F: FnOnce() -> Result<Series, ParseFailure>,
    {
        let key = CacheKey {
            formula: formula.to_string(),
            config_json: config.cache_key(),
        };
        // Only the cell lookup happens under the lock.
        let cell = {
            let mut entries = self.lock();
            if let Some(cell) = entries.get(&key) {
                cell.clone()
            } else {
                let cell = Cell::default();
                entries.put(key, cell.clone());
                cell
            }
        };
        cell.get_or_init(|| compute().map(Arc::new)).clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all cached entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, Cell>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
