//! Separate-chaining hash table keyed by nucleotide words
//!
//! Entries live in a dense node vector. Each node carries two links: the next
//! node in its bucket chain and the next node in the table-wide order chain.
//! Iteration follows the order chain, so it is independent of bucket layout:
//! newest entries come first, and after a rehash the chain is rebuilt bucket
//! by bucket.

use std::fmt;

use log::debug;

use super::hash::{PolymerHash, WordHasher};
use crate::error::{CoreError, CoreResult};

/// Bucket count of a freshly created map
pub const DEFAULT_BUCKET_COUNT: usize = 50;

/// Growth threshold multiplier (entries per bucket)
pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 1.0;

type Link = Option<usize>;

#[derive(Debug, Clone)]
struct Node<V> {
    key: Box<[u8]>,
    value: V,
    hash: u64,
    next_in_bucket: Link,
    next_in_order: Link,
}

/// Word → value map with insertion-ordered traversal.
///
/// Inserting an existing word never overwrites it. Any call that can insert
/// may trigger a rehash that doubles the bucket count and reorders
/// iteration.
#[derive(Clone)]
pub struct KmerMap<V, H = PolymerHash> {
    nodes: Vec<Node<V>>,
    buckets: Vec<Link>,
    head: Link,
    max_load_factor: f32,
    hasher: H,
}

impl<V> KmerMap<V, PolymerHash> {
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKET_COUNT)
    }

    /// Create a map with `bucket_count` buckets (at least one)
    pub fn with_buckets(bucket_count: usize) -> Self {
        Self::with_hasher(bucket_count, PolymerHash)
    }
}

impl<V> Default for KmerMap<V, PolymerHash> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H: WordHasher> KmerMap<V, H> {
    pub fn with_hasher(bucket_count: usize, hasher: H) -> Self {
        Self {
            nodes: Vec::new(),
            buckets: vec![None; bucket_count.max(1)],
            head: None,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            hasher,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of entries chained in bucket `n` (0 for out-of-range buckets)
    pub fn bucket_len(&self, n: usize) -> usize {
        let mut count = 0;
        let mut cursor = self.buckets.get(n).copied().flatten();
        while let Some(idx) = cursor {
            count += 1;
            cursor = self.nodes[idx].next_in_bucket;
        }
        count
    }

    /// Entries per bucket
    pub fn load_factor(&self) -> f32 {
        self.len() as f32 / self.bucket_count() as f32
    }

    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Change the growth threshold, rehashing immediately if the map is now over it
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) -> CoreResult<()> {
        if !(max_load_factor.is_finite() && max_load_factor > 0.0) {
            return Err(CoreError::InvalidParams(format!(
                "max load factor must be positive, got {}",
                max_load_factor
            )));
        }
        self.max_load_factor = max_load_factor;
        self.reserve(self.len());
        Ok(())
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Insert `word` if absent.
    ///
    /// Returns the stored value and whether a new entry was created; an
    /// existing value is left untouched.
    pub fn insert(&mut self, word: &[u8], value: V) -> (&mut V, bool) {
        let hash = self.hasher.hash_word(word);
        match self.find_index(word, hash) {
            Some(idx) => (&mut self.nodes[idx].value, false),
            None => {
                let idx = self.push_node(word, hash, value);
                (&mut self.nodes[idx].value, true)
            }
        }
    }

    /// Return the value for `word`, inserting `V::default()` first if absent
    pub fn get_or_insert_default(&mut self, word: &[u8]) -> &mut V
    where
        V: Default,
    {
        let hash = self.hasher.hash_word(word);
        let idx = match self.find_index(word, hash) {
            Some(idx) => idx,
            None => self.push_node(word, hash, V::default()),
        };
        &mut self.nodes[idx].value
    }

    pub fn get(&self, word: &[u8]) -> Option<&V> {
        self.lookup(word).map(|idx| &self.nodes[idx].value)
    }

    pub fn get_mut(&mut self, word: &[u8]) -> Option<&mut V> {
        let idx = self.lookup(word)?;
        Some(&mut self.nodes[idx].value)
    }

    pub fn get_key_value(&self, word: &[u8]) -> Option<(&[u8], &V)> {
        self.lookup(word).map(|idx| {
            let node = &self.nodes[idx];
            (&*node.key, &node.value)
        })
    }

    /// Strict lookup: a missing word is an error rather than an insertion
    pub fn at(&self, word: &[u8]) -> CoreResult<&V> {
        self.get(word).ok_or_else(|| CoreError::key_not_found(word))
    }

    pub fn at_mut(&mut self, word: &[u8]) -> CoreResult<&mut V> {
        match self.lookup(word) {
            Some(idx) => Ok(&mut self.nodes[idx].value),
            None => Err(CoreError::key_not_found(word)),
        }
    }

    pub fn contains_key(&self, word: &[u8]) -> bool {
        self.lookup(word).is_some()
    }

    /// 0 or 1: keys are unique
    pub fn count(&self, word: &[u8]) -> usize {
        usize::from(self.contains_key(word))
    }

    /// Iterator positioned at `word`, continuing along the order chain.
    ///
    /// Empty when the word is absent.
    pub fn find(&self, word: &[u8]) -> Iter<'_, V> {
        Iter {
            nodes: &self.nodes,
            next: self.lookup(word),
            remaining: self.len(),
        }
    }

    /// All entries equal to `word`: at most one
    pub fn equal_range(&self, word: &[u8]) -> Iter<'_, V> {
        let next = self.lookup(word);
        Iter {
            nodes: &self.nodes,
            next,
            remaining: usize::from(next.is_some()),
        }
    }

    /// Remove `word`, returning its value
    pub fn remove(&mut self, word: &[u8]) -> Option<V> {
        let idx = self.lookup(word)?;
        self.unlink(idx);

        // swap_remove moves the last node into `idx`; retarget links to it first
        let last = self.nodes.len() - 1;
        if idx != last {
            let bucket = self.bucket_of(self.nodes[last].hash);
            self.replace_bucket_link(bucket, last, Some(idx));
            self.replace_order_link(last, Some(idx));
        }
        Some(self.nodes.swap_remove(idx).value)
    }

    /// Remove `word`, returning the number of entries erased (0 or 1)
    pub fn erase(&mut self, word: &[u8]) -> usize {
        usize::from(self.remove(word).is_some())
    }

    /// Drop every entry; the bucket count is kept
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets.iter_mut().for_each(|bucket| *bucket = None);
        self.head = None;
    }

    /// Redistribute all entries over `bucket_count` buckets (at least one).
    ///
    /// Cached hashes are reused. The order chain is rebuilt bucket-major:
    /// bucket 0's chain first, then bucket 1's, and so on.
    pub fn rehash(&mut self, bucket_count: usize) {
        let bucket_count = bucket_count.max(1);
        let mut buckets: Vec<Link> = vec![None; bucket_count];

        let mut cursor = self.head;
        while let Some(idx) = cursor {
            cursor = self.nodes[idx].next_in_order;
            let bucket = (self.nodes[idx].hash % bucket_count as u64) as usize;
            self.nodes[idx].next_in_bucket = buckets[bucket];
            buckets[bucket] = Some(idx);
        }

        self.head = None;
        let mut tail: Link = None;
        for &bucket_head in &buckets {
            let mut cursor = bucket_head;
            while let Some(idx) = cursor {
                cursor = self.nodes[idx].next_in_bucket;
                self.nodes[idx].next_in_order = None;
                match tail {
                    Some(prev) => self.nodes[prev].next_in_order = Some(idx),
                    None => self.head = Some(idx),
                }
                tail = Some(idx);
            }
        }

        debug!(
            "Rehashed {} entries: {} -> {} buckets",
            self.len(),
            self.buckets.len(),
            bucket_count
        );
        self.buckets = buckets;
    }

    /// Make room for `count` entries without further growth
    pub fn reserve(&mut self, count: usize) {
        let needed = (count as f64 / f64::from(self.max_load_factor)).ceil() as usize;
        if needed > self.bucket_count() {
            self.rehash(needed);
        }
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            nodes: &self.nodes,
            next: self.head,
            remaining: self.len(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        let order = self.order();
        let mut slots: Vec<Option<(&[u8], &mut V)>> = self
            .nodes
            .iter_mut()
            .map(|node| Some((&*node.key, &mut node.value)))
            .collect();
        let entries: Vec<_> = order
            .into_iter()
            .filter_map(|idx| slots[idx].take())
            .collect();
        IterMut {
            entries: entries.into_iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    fn lookup(&self, word: &[u8]) -> Option<usize> {
        self.find_index(word, self.hasher.hash_word(word))
    }

    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    fn find_index(&self, word: &[u8], hash: u64) -> Option<usize> {
        let mut cursor = self.buckets[self.bucket_of(hash)];
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            if *node.key == *word {
                return Some(idx);
            }
            cursor = node.next_in_bucket;
        }
        None
    }

    fn threshold(&self) -> f32 {
        self.bucket_count() as f32 * self.max_load_factor
    }

    fn push_node(&mut self, word: &[u8], hash: u64, value: V) -> usize {
        if (self.len() + 1) as f32 > self.threshold() {
            self.rehash(self.bucket_count() * 2);
        }

        let bucket = self.bucket_of(hash);
        let idx = self.nodes.len();
        self.nodes.push(Node {
            key: word.into(),
            value,
            hash,
            next_in_bucket: self.buckets[bucket],
            next_in_order: self.head,
        });
        self.buckets[bucket] = Some(idx);
        self.head = Some(idx);
        idx
    }

    fn unlink(&mut self, idx: usize) {
        let bucket = self.bucket_of(self.nodes[idx].hash);
        let next_in_bucket = self.nodes[idx].next_in_bucket;
        let next_in_order = self.nodes[idx].next_in_order;
        self.replace_bucket_link(bucket, idx, next_in_bucket);
        self.replace_order_link(idx, next_in_order);
    }

    /// Point the link in `bucket`'s chain that targets `from` at `to`
    fn replace_bucket_link(&mut self, bucket: usize, from: usize, to: Link) {
        if self.buckets[bucket] == Some(from) {
            self.buckets[bucket] = to;
            return;
        }
        let mut cursor = self.buckets[bucket];
        while let Some(idx) = cursor {
            if self.nodes[idx].next_in_bucket == Some(from) {
                self.nodes[idx].next_in_bucket = to;
                return;
            }
            cursor = self.nodes[idx].next_in_bucket;
        }
    }

    /// Point the order-chain link that targets `from` at `to`
    fn replace_order_link(&mut self, from: usize, to: Link) {
        if self.head == Some(from) {
            self.head = to;
            return;
        }
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            if self.nodes[idx].next_in_order == Some(from) {
                self.nodes[idx].next_in_order = to;
                return;
            }
            cursor = self.nodes[idx].next_in_order;
        }
    }

    fn order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            order.push(idx);
            cursor = self.nodes[idx].next_in_order;
        }
        order
    }
}

/// Two maps are equal when they hold the same entries in the same iteration
/// order, so insertion history and rehash state both matter.
impl<V: PartialEq, H: WordHasher> PartialEq for KmerMap<V, H> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V: fmt::Debug, H: WordHasher> fmt::Debug for KmerMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .map(|(key, value)| (String::from_utf8_lossy(key), value)),
            )
            .finish()
    }
}

impl<W: AsRef<[u8]>, V, H: WordHasher> Extend<(W, V)> for KmerMap<V, H> {
    fn extend<I: IntoIterator<Item = (W, V)>>(&mut self, iter: I) {
        for (word, value) in iter {
            self.insert(word.as_ref(), value);
        }
    }
}

impl<W: AsRef<[u8]>, V> FromIterator<(W, V)> for KmerMap<V, PolymerHash> {
    fn from_iter<I: IntoIterator<Item = (W, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, V, H: WordHasher> IntoIterator for &'a KmerMap<V, H> {
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V, H: WordHasher> IntoIterator for &'a mut KmerMap<V, H> {
    type Item = (&'a [u8], &'a mut V);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Order-chain iterator over `(word, value)` pairs
pub struct Iter<'a, V> {
    nodes: &'a [Node<V>],
    next: Link,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.next?];
        self.next = node.next_in_order;
        self.remaining -= 1;
        Some((&*node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// Order-chain iterator with mutable values
pub struct IterMut<'a, V> {
    entries: std::vec::IntoIter<(&'a [u8], &'a mut V)>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a [u8], &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}
