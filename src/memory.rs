use lru::LruCache;
use rand::Rng;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use crate::types::{MessageKey, MessageSnapshot};

/// Recently reacted messages, kept for rotation.
///
/// The queue holds keys only and drops the oldest on overflow. Snapshots live
/// in a separate LRU of the same capacity that evicts on its own schedule, so a
/// key can be queued without a snapshot but a snapshot is only ever stored for
/// a key that was queued.
pub struct MessageMemory {
    inner: Mutex<Inner>,
}

struct Inner {
    capacity: usize,
    queue: VecDeque<MessageKey>,
    snapshots: LruCache<MessageKey, MessageSnapshot>,
}

impl MessageMemory {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                capacity: capacity.get(),
                queue: VecDeque::with_capacity(capacity.get()),
                snapshots: LruCache::new(capacity),
            }),
        }
    }

    pub fn remember(&self, key: MessageKey) {
        let mut inner = self.inner.lock().unwrap();
        if inner.queue.len() == inner.capacity {
            inner.queue.pop_front();
        }
        inner.queue.push_back(key);
    }

    pub fn random_key<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<MessageKey> {
        let inner = self.inner.lock().unwrap();
        if inner.queue.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..inner.queue.len());
        inner.queue.get(index).copied()
    }

    /// Cached snapshot for `key`, bumping its recency.
    pub fn snapshot(&self, key: &MessageKey) -> Option<MessageSnapshot> {
        self.inner.lock().unwrap().snapshots.get(key).cloned()
    }

    /// Stores a fetched snapshot. Ignored for keys that are no longer queued.
    pub fn keep_snapshot(&self, key: MessageKey, snapshot: MessageSnapshot) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if !inner.queue.contains(&key) {
            return false;
        }
        inner.snapshots.put(key, snapshot);
        true
    }

    pub fn forget(&self, key: &MessageKey) {
        let mut inner = self.inner.lock().unwrap();
        inner.queue.retain(|k| k != key);
        inner.snapshots.pop(key);
    }

    pub fn contains(&self, key: &MessageKey) -> bool {
        self.inner.lock().unwrap().queue.contains(key)
    }

    pub fn has_snapshot(&self, key: &MessageKey) -> bool {
        self.inner.lock().unwrap().snapshots.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }

    pub fn snapshot_count(&self) -> usize {
        self.inner.lock().unwrap().snapshots.len()
    }

    /// Queued keys, oldest first.
    pub fn keys(&self) -> Vec<MessageKey> {
        self.inner.lock().unwrap().queue.iter().copied().collect()
    }
}
