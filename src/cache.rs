//! Least-recently-used page text cache.
//!
//! Pages are stored in an arena of index-addressed nodes linked into a
//! recency list (head = most recently used, tail = least recently used),
//! with a hash map from page number to slot. Eviction always removes the
//! tail, and it happens before the new page is inserted so the cache never
//! holds more than `capacity` pages.
//!
//! All operations take the internal lock, so a cache can be shared between
//! a UI thread and background prefetchers.

use crate::config::DEFAULT_CACHE_CAPACITY;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Size information reported by [`PageCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    /// Number of pages currently cached
    pub cached_pages: usize,
    /// Maximum number of pages the cache holds
    pub max_size: usize,
}

/// Full statistics including hit/miss counters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CacheStatistics {
    /// Number of pages currently cached
    pub size: usize,
    /// Maximum number of pages the cache holds
    pub max_size: usize,
    /// Number of successful lookups
    pub hits: u64,
    /// Number of failed lookups
    pub misses: u64,
    /// `hits + misses`
    pub total: u64,
    /// `hits / total`, or 0.0 before the first lookup
    pub hit_rate: f64,
}

#[derive(Debug)]
struct Node {
    page: usize,
    text: String,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
struct CacheState {
    capacity: usize,
    /// page -> slot in `nodes`
    index: HashMap<usize, usize>,
    nodes: Vec<Node>,
    head: Option<usize>,
    tail: Option<usize>,
    hits: u64,
    misses: u64,
}

impl CacheState {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            index: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            hits: 0,
            misses: 0,
        }
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[slot].prev = None;
        self.nodes[slot].next = None;
    }

    fn push_front(&mut self, slot: usize) {
        self.nodes[slot].prev = None;
        self.nodes[slot].next = self.head;
        if let Some(old_head) = self.head {
            self.nodes[old_head].prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }

    fn promote(&mut self, slot: usize) {
        if self.head != Some(slot) {
            self.unlink(slot);
            self.push_front(slot);
        }
    }

    /// Detach the least recently used node and return its slot for reuse.
    fn evict_tail(&mut self) -> Option<usize> {
        let slot = self.tail?;
        self.unlink(slot);
        let page = self.nodes[slot].page;
        self.index.remove(&page);
        log::debug!("Page cache evicted page {}", page);
        Some(slot)
    }

    fn insert(&mut self, page: usize, text: String) {
        if let Some(&slot) = self.index.get(&page) {
            self.nodes[slot].text = text;
            self.promote(slot);
            return;
        }

        let node = Node {
            page,
            text,
            prev: None,
            next: None,
        };

        let slot = if self.index.len() >= self.capacity {
            match self.evict_tail() {
                Some(slot) => {
                    self.nodes[slot] = node;
                    slot
                },
                None => {
                    self.nodes.push(node);
                    self.nodes.len() - 1
                },
            }
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        };

        self.index.insert(page, slot);
        self.push_front(slot);
    }

    fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }
}

/// Fixed-capacity LRU cache mapping page number to extracted text.
///
/// # Example
///
/// ```
/// use pdf_pager::cache::PageCache;
///
/// let cache = PageCache::new(2);
/// cache.put(1, "first".to_string());
/// cache.put(2, "second".to_string());
/// assert_eq!(cache.get(1).as_deref(), Some("first"));
///
/// // Page 2 is now least recently used and makes room for page 3.
/// cache.put(3, "third".to_string());
/// assert!(!cache.contains(2));
/// assert_eq!(cache.stats().cached_pages, 2);
/// ```
#[derive(Debug)]
pub struct PageCache {
    state: RwLock<CacheState>,
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl PageCache {
    /// Create a cache holding at most `capacity` pages.
    ///
    /// A capacity of zero is replaced by [`DEFAULT_CACHE_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CACHE_CAPACITY
        } else {
            capacity
        };
        Self {
            state: RwLock::new(CacheState::new(capacity)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up a page, marking it most recently used on a hit.
    ///
    /// A miss only increments the miss counter; cached entries are untouched.
    pub fn get(&self, page: usize) -> Option<String> {
        let mut state = self.write();
        match state.index.get(&page).copied() {
            Some(slot) => {
                state.promote(slot);
                state.hits += 1;
                Some(state.nodes[slot].text.clone())
            },
            None => {
                state.misses += 1;
                None
            },
        }
    }

    /// Store a page, evicting the least recently used page when full.
    ///
    /// Storing an already cached page replaces its text and promotes it
    /// without changing the cache size.
    pub fn put(&self, page: usize, text: String) {
        self.write().insert(page, text);
    }

    /// Check whether a page is cached without touching recency or counters.
    pub fn contains(&self, page: usize) -> bool {
        self.read().index.contains_key(&page)
    }

    /// Cached page numbers, most recently used first.
    pub fn pages(&self) -> Vec<usize> {
        let state = self.read();
        let mut pages = Vec::with_capacity(state.index.len());
        let mut cursor = state.head;
        while let Some(slot) = cursor {
            pages.push(state.nodes[slot].page);
            cursor = state.nodes[slot].next;
        }
        pages
    }

    /// Remove every page. Hit/miss counters are kept.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Number of cached pages.
    pub fn len(&self) -> usize {
        self.read().index.len()
    }

    /// True when no page is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of pages.
    pub fn capacity(&self) -> usize {
        self.read().capacity
    }

    /// Current size and capacity.
    pub fn stats(&self) -> CacheStats {
        let state = self.read();
        CacheStats {
            cached_pages: state.index.len(),
            max_size: state.capacity,
        }
    }

    /// Fraction of lookups that were hits, in `[0, 1]`.
    pub fn hit_rate(&self) -> f64 {
        let state = self.read();
        let total = state.hits + state.misses;
        if total == 0 {
            0.0
        } else {
            state.hits as f64 / total as f64
        }
    }

    /// Zero the hit/miss counters. Cached pages are kept.
    pub fn reset(&self) {
        let mut state = self.write();
        state.hits = 0;
        state.misses = 0;
    }

    /// Size, capacity and counters in one snapshot.
    pub fn detailed_stats(&self) -> CacheStatistics {
        let state = self.read();
        let total = state.hits + state.misses;
        CacheStatistics {
            size: state.index.len(),
            max_size: state.capacity,
            hits: state.hits,
            misses: state.misses,
            total,
            hit_rate: if total == 0 {
                0.0
            } else {
                state.hits as f64 / total as f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn filled(capacity: usize, pages: &[usize]) -> PageCache {
        let cache = PageCache::new(capacity);
        for &page in pages {
            cache.put(page, format!("page {}", page));
        }
        cache
    }

    #[test]
    fn test_new_cache() {
        let cache = PageCache::new(10);
        assert_eq!(cache.capacity(), 10);
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats { cached_pages: 0, max_size: 10 });
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let cache = PageCache::new(0);
        assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_put_and_get() {
        let cache = PageCache::new(3);
        cache.put(1, "Page 1 content".to_string());
        assert_eq!(cache.get(1), Some("Page 1 content".to_string()));
        assert_eq!(cache.get(2), None);
    }

    #[test]
    fn test_update_existing_page() {
        let cache = filled(3, &[1, 2]);
        cache.put(1, "updated".to_string());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(1).as_deref(), Some("updated"));
        // Page 1 was promoted by the update, so page 2 is the eviction victim
        cache.put(3, "c".to_string());
        cache.put(4, "d".to_string());
        assert!(!cache.contains(2));
        assert!(cache.contains(1));
    }

    #[test]
    fn test_eviction_order() {
        let cache = filled(3, &[1, 2, 3, 4]);
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(1));
        assert_eq!(cache.pages(), vec![4, 3, 2]);
    }

    #[test]
    fn test_access_updates_recency() {
        let cache = filled(3, &[1, 2, 3]);
        assert!(cache.get(1).is_some());
        cache.put(4, "page 4".to_string());

        assert!(cache.contains(1));
        assert!(!cache.contains(2));
        assert!(cache.contains(3));
        assert!(cache.contains(4));
    }

    #[test]
    fn test_miss_does_not_mutate() {
        let cache = filled(2, &[1, 2]);
        assert_eq!(cache.get(99), None);
        assert_eq!(cache.pages(), vec![2, 1]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_capacity_one() {
        let cache = filled(1, &[1, 2, 3]);
        assert_eq!(cache.pages(), vec![3]);
        assert_eq!(cache.get(3).as_deref(), Some("page 3"));
    }

    #[test]
    fn test_clear_keeps_counters() {
        let cache = filled(3, &[1, 2]);
        cache.get(1);
        cache.get(5);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.pages(), Vec::<usize>::new());
        let stats = cache.detailed_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);

        // Cache is fully usable after clearing
        cache.put(7, "seven".to_string());
        assert_eq!(cache.get(7).as_deref(), Some("seven"));
    }

    #[test]
    fn test_hit_rate() {
        let cache = filled(3, &[1]);
        assert_eq!(cache.hit_rate(), 0.0);
        cache.get(1);
        cache.get(1);
        cache.get(2);
        assert_eq!(cache.hit_rate(), 2.0 / 3.0);
    }

    #[test]
    fn test_reset_counters_only() {
        let cache = filled(3, &[1, 2]);
        cache.get(1);
        cache.get(3);
        cache.reset();
        assert_eq!(cache.hit_rate(), 0.0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_detailed_stats() {
        let cache = filled(4, &[1, 2]);
        cache.get(1);
        cache.get(2);
        cache.get(3);
        cache.get(4);

        let stats = cache.detailed_stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.max_size, 4);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_concurrent_put_get() {
        let cache = Arc::new(PageCache::new(8));
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..200 {
                        let page = (worker * 200 + i) % 20;
                        cache.put(page, format!("page {}", page));
                        if let Some(text) = cache.get(page) {
                            assert!(text.starts_with("page "));
                        }
                        assert!(cache.len() <= 8);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 8);
        assert_eq!(cache.pages().len(), cache.len());
    }
}
