//! Sharded concurrent map shared by the keyspace and the leaderboard.
//!
//! Keys are distributed across a fixed number of shards by hash, each shard
//! being a `RwLock<HashMap>`. Operations on keys in different shards never
//! contend. A read-modify-write on one key runs entirely under that key's
//! shard write lock, so concurrent writers to the same key are serialized.

use bytes::Bytes;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Number of shards.
/// More shards = less lock contention, but more memory overhead.
pub const NUM_SHARDS: usize = 64;

pub(crate) type ShardGuard<'a, V> = RwLockWriteGuard<'a, HashMap<Bytes, V>>;
pub(crate) type ShardReadGuard<'a, V> = RwLockReadGuard<'a, HashMap<Bytes, V>>;

#[derive(Debug)]
pub(crate) struct ShardedMap<V> {
    shards: Vec<RwLock<HashMap<Bytes, V>>>,
}

impl<V> ShardedMap<V> {
    pub(crate) fn new() -> Self {
        Self {
            shards: (0..NUM_SHARDS).map(|_| RwLock::new(HashMap::new())).collect(),
        }
    }

    #[inline]
    fn shard_index(&self, key: &[u8]) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    /// Takes the read lock of the shard owning `key`.
    ///
    /// A poisoned lock is recovered: every mutation leaves the map in a
    /// consistent state before any code that could panic runs.
    pub(crate) fn read(&self, key: &[u8]) -> ShardReadGuard<'_, V> {
        self.shards[self.shard_index(key)]
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the write lock of the shard owning `key`.
    pub(crate) fn write(&self, key: &[u8]) -> ShardGuard<'_, V> {
        self.shards[self.shard_index(key)]
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Visits every shard in turn under its read lock.
    pub(crate) fn for_each_shard(&self, mut f: impl FnMut(&HashMap<Bytes, V>)) {
        for shard in &self.shards {
            let map = shard.read().unwrap_or_else(PoisonError::into_inner);
            f(&map);
        }
    }

    /// Exact number of entries, counted shard by shard.
    pub(crate) fn len(&self) -> usize {
        let mut total = 0;
        self.for_each_shard(|map| total += map.len());
        total
    }
}

impl<V> Default for ShardedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}
