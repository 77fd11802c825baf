//! Bounded evaluation cache keyed by the FNV hash of the compiled
//! bytecode. Values are immutable once inserted; the map is read-mostly
//! behind a reader-writer lock and survives across generations.

use super::evaluator::Evaluation;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::RwLock;

pub struct FitnessCache {
    inner: RwLock<Inner>,
}

struct Inner {
    map: HashMap<u64, Arc<Evaluation>>,
    /// insertion order drives eviction
    order: VecDeque<u64>,
    cap: usize,
}

impl FitnessCache {
    pub fn new(cap: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                map: HashMap::with_capacity(cap),
                order: VecDeque::with_capacity(cap),
                cap: cap.max(1),
            }),
        }
    }

    pub fn get(&self, key: u64) -> Option<Arc<Evaluation>> {
        self.inner.read().expect("cache lock").map.get(&key).cloned()
    }

    /// first write wins so concurrent evaluators agree on the value
    pub fn insert(&self, key: u64, value: Arc<Evaluation>) -> Arc<Evaluation> {
        let mut inner = self.inner.write().expect("cache lock");
        if let Some(existing) = inner.map.get(&key) {
            return existing.clone();
        }
        while inner.order.len() >= inner.cap {
            if let Some(evicted) = inner.order.pop_front() {
                inner.map.remove(&evicted);
            }
        }
        inner.order.push_back(key);
        inner.map.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("cache lock").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(fitness: f64) -> Arc<Evaluation> {
        Arc::new(Evaluation {
            fitness,
            ..Default::default()
        })
    }

    #[test]
    fn bounded_eviction_is_fifo() {
        let cache = FitnessCache::new(2);
        cache.insert(1, eval(0.1));
        cache.insert(2, eval(0.2));
        cache.insert(3, eval(0.3));
        assert!(cache.len() == 2);
        assert!(cache.get(1).is_none());
        assert!(cache.get(3).is_some());
    }

    #[test]
    fn first_insert_wins() {
        let cache = FitnessCache::new(4);
        cache.insert(7, eval(0.5));
        let kept = cache.insert(7, eval(0.9));
        assert!(kept.fitness == 0.5);
        assert!(cache.get(7).expect("cached").fitness == 0.5);
    }
}
