use crate::config::symbols::DEFAULT_BUCKET_COUNT;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

/// Separate-chaining hash table with a fixed bucket count.
///
/// `insert` never overwrites an existing key: declaring a name twice must be
/// visible to the caller rather than silently merged.
#[derive(Debug, Clone)]
pub struct ChainedHashTable<K, V> {
    buckets: Vec<Vec<(K, V)>>,
}

impl<K: Hash + Eq, V> ChainedHashTable<K, V> {
    pub fn new() -> Self {
        Self::with_buckets(NonZeroUsize::new(DEFAULT_BUCKET_COUNT).unwrap_or(NonZeroUsize::MIN))
    }

    pub fn with_buckets(bucket_count: NonZeroUsize) -> Self {
        let mut buckets = Vec::with_capacity(bucket_count.get());
        buckets.resize_with(bucket_count.get(), Vec::new);
        Self { buckets }
    }

    fn bucket_index<Q: Hash + ?Sized>(&self, key: &Q) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.buckets.len() as u64) as usize
    }

    /// Returns `false` and leaves the table untouched if `key` is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let index = self.bucket_index(&key);
        let chain = &mut self.buckets[index];
        if chain.iter().any(|(k, _)| *k == key) {
            return false;
        }
        chain.push((key, value));
        true
    }

    /// Removes `key` if present; returns whether anything was removed.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let chain = &mut self.buckets[index];
        let before = chain.len();
        chain.retain(|(k, _)| k.borrow() != key);
        chain.len() != before
    }

    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        self.buckets[index]
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        self.buckets[index]
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Entries in bucket order, then insertion order within a bucket.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flatten().map(|(k, v)| (k, v))
    }
}

impl<K: Hash + Eq, V> Default for ChainedHashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
