//! In-memory memoization of classification results.
//!
//! Identical text always yields the same scores from a stateless oracle, so
//! successful results are kept keyed by the exact input in a bounded LRU.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use super::types::RankedEmotionList;

/// Bounded LRU of ranked results keyed by input text.
pub struct ResultCache {
    cache: Mutex<LruCache<String, RankedEmotionList>>,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` results, or `None` when
    /// `capacity` is 0.
    pub fn new(capacity: usize) -> Option<Self> {
        let capacity = NonZeroUsize::new(capacity)?;
        Some(Self {
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    pub fn capacity(&self) -> usize {
        self.cache.lock().map(|c| c.cap().get()).unwrap_or(0)
    }

    /// Get a cached result and mark it recently used.
    pub fn get(&self, text: &str) -> Option<RankedEmotionList> {
        let mut cache = self.cache.lock().ok()?;
        cache.get(text).cloned()
    }

    /// Store a result, evicting the least recently used entry when full.
    pub fn insert(&self, text: String, value: RankedEmotionList) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(text, value);
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }
}
