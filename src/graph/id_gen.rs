//! Dense ID assignment for external keys

use std::collections::HashMap;
use std::hash::Hash;

/// Bijection between external keys and dense ids `0..len()`.
///
/// Ids are handed out in first-seen order; asking for an unseen key
/// appends it.
///
/// # Examples
/// ```
/// use attrgraph::graph::UniqueIdGenerator;
///
/// let mut ids = UniqueIdGenerator::new();
/// assert_eq!(ids.id("a"), 0);
/// assert_eq!(ids.id("b"), 1);
/// assert_eq!(ids.id("a"), 0);
/// assert_eq!(ids.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct UniqueIdGenerator<K> {
    ids: HashMap<K, usize>,
    keys: Vec<K>,
}

impl<K: Hash + Eq + Clone> Default for UniqueIdGenerator<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> UniqueIdGenerator<K> {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            keys: Vec::new(),
        }
    }

    /// Seed with known keys; they receive ids `0..` in iteration order
    pub fn with_initial<I: IntoIterator<Item = K>>(initial: I) -> Self {
        let mut generator = Self::new();
        for key in initial {
            generator.id(key);
        }
        generator
    }

    /// Id of `key`, assigning the next free one if unseen
    pub fn id(&mut self, key: K) -> usize {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.keys.len();
        self.keys.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    /// Id of `key` without assigning
    pub fn get(&self, key: &K) -> Option<usize> {
        self.ids.get(key).copied()
    }

    /// Key that owns `id`
    pub fn key(&self, id: usize) -> Option<&K> {
        self.keys.get(id)
    }

    /// Keys in id order
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }

    /// Number of distinct keys seen
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
