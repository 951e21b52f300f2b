//! Tests for the LRU page cache.

use pdf_pager::PageCache;
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

mod lru_order {
    use super::*;

    #[test]
    fn test_reader_session() {
        let cache = PageCache::new(3);
        for page in 1..=3 {
            cache.put(page, format!("page {}", page));
        }

        // Re-reading page 1 protects it from the next eviction
        assert_eq!(cache.get(1).as_deref(), Some("page 1"));
        cache.put(4, "page 4".to_string());

        assert!(cache.contains(1));
        assert!(!cache.contains(2));
        assert!(cache.contains(3));
        assert!(cache.contains(4));
        assert_eq!(cache.pages(), vec![4, 1, 3]);
    }

    #[test]
    fn test_replace_keeps_size() {
        let cache = PageCache::new(2);
        cache.put(1, "old".to_string());
        cache.put(2, "two".to_string());
        cache.put(1, "new".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.pages(), vec![1, 2]);
        assert_eq!(cache.get(1).as_deref(), Some("new"));
    }

    #[test]
    fn test_capacity_one() {
        let cache = PageCache::new(1);
        cache.put(1, "a".to_string());
        cache.put(2, "b".to_string());
        assert_eq!(cache.pages(), vec![2]);
        assert_eq!(cache.get(1), None);
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let cache = PageCache::new(0);
        assert_eq!(cache.capacity(), pdf_pager::config::DEFAULT_CACHE_CAPACITY);
    }
}

mod statistics {
    use super::*;

    #[test]
    fn test_hits_and_misses() {
        let cache = PageCache::new(2);
        cache.put(1, "one".to_string());

        assert!(cache.get(1).is_some());
        assert!(cache.get(1).is_some());
        assert!(cache.get(9).is_none());

        let stats = cache.detailed_stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total, 3);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains_does_not_count() {
        let cache = PageCache::new(2);
        cache.put(1, "one".to_string());
        assert!(cache.contains(1));
        assert!(!cache.contains(2));
        assert_eq!(cache.detailed_stats().total, 0);
        assert_eq!(cache.hit_rate(), 0.0);
    }

    #[test]
    fn test_clear_and_reset() {
        let cache = PageCache::new(2);
        cache.put(1, "one".to_string());
        cache.get(1);
        cache.get(2);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.detailed_stats().total, 2);

        cache.reset();
        let stats = cache.detailed_stats();
        assert_eq!((stats.hits, stats.misses, stats.total), (0, 0, 0));
        assert_eq!(stats.hit_rate, 0.0);
    }
}

#[test]
fn test_concurrent_access() {
    let cache = Arc::new(PageCache::new(4));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..200 {
                    let page = (t * 7 + i) % 10 + 1;
                    if cache.get(page).is_none() {
                        cache.put(page, format!("page {}", page));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    let stats = cache.detailed_stats();
    assert!(stats.size <= 4);
    assert_eq!(stats.total, 8 * 200);
    for page in cache.pages() {
        assert_eq!(cache.get(page), Some(format!("page {}", page)));
    }
}

#[derive(Debug, Clone)]
enum Op {
    Get(usize),
    Put(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![(1usize..20).prop_map(Op::Get), (1usize..20).prop_map(Op::Put)]
}

proptest! {
    #[test]
    fn prop_size_never_exceeds_capacity(
        capacity in 1usize..8,
        ops in prop::collection::vec(op(), 0..200),
    ) {
        let cache = PageCache::new(capacity);
        for op in ops {
            match op {
                Op::Get(page) => {
                    if let Some(text) = cache.get(page) {
                        prop_assert_eq!(text, format!("p{}", page));
                    }
                },
                Op::Put(page) => cache.put(page, format!("p{}", page)),
            }
            prop_assert!(cache.len() <= capacity);
            prop_assert_eq!(cache.pages().len(), cache.len());
        }
    }

    #[test]
    fn prop_last_put_is_most_recent(
        pages in prop::collection::vec(1usize..20, 1..50),
    ) {
        let cache = PageCache::new(3);
        for &page in &pages {
            cache.put(page, String::new());
        }
        let last = *pages.last().unwrap();
        prop_assert_eq!(cache.pages().first().copied(), Some(last));
    }
}
