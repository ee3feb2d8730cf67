//! Process-wide memoization cache for parsed paths
//!
//! A hand-rolled bounded LRU keyed by the exact path text. The cache is the
//! only shared mutable state in the crate; the `Mutex` keeps it safe for
//! embedding hosts that resolve paths from multiple threads. On lock
//! failure callers fall back to an uncached parse.
//!
//! Copyright (c) 2025 Datamorph Team
//! Licensed under the Apache-2.0 license

use super::Path;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, OnceLock};

const PATH_CACHE_LIMIT: usize = 512;

static PATH_CACHE: OnceLock<Mutex<LruCache>> = OnceLock::new();

#[derive(Debug)]
struct LruCache {
    limit: usize,
    map: HashMap<String, Arc<Path>>,
    order: VecDeque<String>,
}

impl LruCache {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn get(&mut self, key: &str) -> Option<Arc<Path>> {
        let value = self.map.get(key).cloned();
        if value.is_some() {
            self.touch(key);
        }
        value
    }

    fn insert(&mut self, key: String, value: Arc<Path>) {
        if self.map.contains_key(&key) {
            self.map.insert(key.clone(), value);
            self.touch(&key);
            return;
        }

        self.map.insert(key.clone(), value);
        self.order.push_back(key);
        self.evict_if_needed();
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|existing| existing == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.to_string());
    }

    fn evict_if_needed(&mut self) {
        while self.map.len() > self.limit {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.map.remove(&oldest);
        }
    }
}

fn shared() -> &'static Mutex<LruCache> {
    PATH_CACHE.get_or_init(|| Mutex::new(LruCache::new(PATH_CACHE_LIMIT)))
}

/// Look up a previously parsed path by its exact text.
pub(crate) fn lookup(text: &str) -> Option<Arc<Path>> {
    match shared().lock() {
        Ok(mut guard) => guard.get(text),
        Err(_) => None,
    }
}

/// Store a successful parse. Failed parses are never stored.
pub(crate) fn store(text: &str, path: Arc<Path>) {
    if let Ok(mut guard) = shared().lock() {
        guard.insert(text.to_string(), path);
    }
}
