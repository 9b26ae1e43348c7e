use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use hashbrown::HashMap;
use terrane_world::{ChunkCoord, HeightField, HeightSamples};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeightCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

/// Bounded LRU of 16x16 height samples per `(cx, cz)` column, so a vertical
/// stack of chunks samples the height field once.
pub struct HeightCache {
    entries: RwLock<HashMap<(i32, i32), Arc<HeightSamples>>>,
    order: Mutex<VecDeque<(i32, i32)>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl HeightCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            order: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn get_or_sample(&self, field: &dyn HeightField, coord: ChunkCoord) -> Arc<HeightSamples> {
        let key = (coord.cx, coord.cz);
        if let Some(samples) = self.lookup(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            self.touch(&key);
            return samples;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let samples = Arc::new(HeightSamples::sample(field, coord));
        self.insert(key, Arc::clone(&samples));
        samples
    }

    pub fn clear(&self) {
        let removed = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            let len = entries.len() as u64;
            entries.clear();
            len
        };
        if removed > 0 {
            self.evictions.fetch_add(removed, Ordering::Relaxed);
        }
        self.order
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn stats(&self) -> HeightCacheStats {
        HeightCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.entries.read().map(|m| m.len()).unwrap_or(0),
        }
    }

    fn lookup(&self, key: &(i32, i32)) -> Option<Arc<HeightSamples>> {
        self.entries
            .read()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn insert(&self, key: (i32, i32), samples: Arc<HeightSamples>) {
        {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.insert(key, samples);
        }
        {
            let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(pos) = order.iter().position(|k| *k == key) {
                order.remove(pos);
            }
            order.push_back(key);
        }
        self.enforce_capacity();
    }

    fn touch(&self, key: &(i32, i32)) {
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pos) = order.iter().position(|k| k == key) {
            if let Some(entry) = order.remove(pos) {
                order.push_back(entry);
            }
        }
    }

    fn enforce_capacity(&self) {
        let mut victims = Vec::new();
        {
            let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
            while order.len() > self.capacity {
                if let Some(old) = order.pop_front() {
                    victims.push(old);
                }
            }
        }
        if victims.is_empty() {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        for key in victims {
            if entries.remove(&key).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
