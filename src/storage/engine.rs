//! Thread-Safe Typed Storage Engine
//!
//! This module implements the keyspace of scorekv: a sharded concurrent map
//! from key to a typed [`Entry`] (string, list, set or hash) with optional
//! expiry.
//!
//! ## Design Decisions
//!
//! 1. **Sharded Locks**: Instead of one big lock, keys are spread over 64 shards.
//! 2. **Per-Key Serialization**: every load-check-mutate sequence runs under the
//!    owning shard's write lock, so two writers to one key cannot lose updates.
//! 3. **Lazy Expiry Only**: an expired entry is removed by whichever command
//!    touches it next. Nothing sweeps in the background.
//! 4. **No Empty Containers**: a list, set or hash emptied by a command is removed.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     StorageEngine                           │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │ Shard N │           │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ RwLock  │           │
//! │  │ HashMap │ │ HashMap │ │ HashMap │ │ HashMap │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::storage::shard::{ShardGuard, ShardedMap};
use crate::storage::value::{Entry, Value, ValueKind};
use bytes::Bytes;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Errors raised by typed operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The key holds a value of a different kind than the command expects
    #[error("Operation against a key holding the wrong kind of value")]
    WrongType,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Result of a TTL query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// The key does not exist (or had expired)
    Missing,
    /// The key exists and never expires
    Persistent,
    /// Whole seconds left before the key expires
    Seconds(u64),
}

impl Ttl {
    /// The integer reply form: -2, -1 or the remaining seconds.
    pub fn as_reply(&self) -> i64 {
        match self {
            Ttl::Missing => -2,
            Ttl::Persistent => -1,
            Ttl::Seconds(secs) => i64::try_from(*secs).unwrap_or(i64::MAX),
        }
    }
}

/// The keyspace.
///
/// Designed to be wrapped in an `Arc` and shared across all connection
/// tasks. All operations are thread-safe and none of them block on I/O.
///
/// # Example
///
/// ```
/// use scorekv::storage::StorageEngine;
/// use bytes::Bytes;
///
/// let engine = StorageEngine::new();
///
/// engine.set(Bytes::from("name"), Bytes::from("Dana"), None);
/// assert_eq!(engine.get(b"name"), Ok(Some(Bytes::from("Dana"))));
///
/// let len = engine.lpush(Bytes::from("queue"), vec![Bytes::from("a"), Bytes::from("b")]);
/// assert_eq!(len, Ok(2));
/// ```
pub struct StorageEngine {
    keys: ShardedMap<Entry>,

    /// Statistics: number of entries removed because they were found expired
    expired_count: AtomicU64,
}

impl std::fmt::Debug for StorageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEngine")
            .field("keys", &self.keys.len())
            .field("expired_count", &self.expired_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for StorageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine {
    pub fn new() -> Self {
        Self {
            keys: ShardedMap::new(),
            expired_count: AtomicU64::new(0),
        }
    }

    // ========================================================================
    // Access helpers
    // ========================================================================

    /// Removes `key` from a locked shard if it is present and expired.
    /// Returns true if something was removed.
    fn purge_expired(&self, map: &mut ShardGuard<'_, Entry>, key: &[u8]) -> bool {
        if map.get(key).is_some_and(Entry::is_expired) {
            map.remove(key);
            self.expired_count.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Runs `f` against the live entry for `key`, if any.
    ///
    /// Takes a read lock on the fast path. If the entry turns out to be
    /// expired, re-checks under the write lock, removes it, and hands `f`
    /// whatever is live at that point.
    fn read_entry<T>(&self, key: &[u8], f: impl FnOnce(Option<&Entry>) -> T) -> T {
        {
            let map = self.keys.read(key);
            match map.get(key) {
                Some(entry) if entry.is_expired() => {}
                live => return f(live),
            }
        }

        let mut map = self.keys.write(key);
        self.purge_expired(&mut map, key);
        f(map.get(key))
    }

    /// Read-only access to a live value. `None` when the key is absent.
    fn inspect<T>(
        &self,
        key: &[u8],
        f: impl FnOnce(&Value) -> StorageResult<T>,
    ) -> StorageResult<Option<T>> {
        self.read_entry(key, |entry| entry.map(|e| f(&e.value)).transpose())
    }

    /// Mutates the value at `key`, creating it with `init` if absent or
    /// expired. The whole sequence runs under the shard write lock.
    fn upsert<T>(
        &self,
        key: Bytes,
        init: impl FnOnce() -> Value,
        f: impl FnOnce(&mut Value) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut map = self.keys.write(&key);
        self.purge_expired(&mut map, &key);
        let entry = map.entry(key).or_insert_with(|| Entry::new(init()));
        f(&mut entry.value)
    }

    /// Mutates an existing value at `key`. Returns `None` if the key is
    /// absent or expired. A container left empty is removed.
    fn modify<T>(
        &self,
        key: &[u8],
        f: impl FnOnce(&mut Value) -> StorageResult<T>,
    ) -> StorageResult<Option<T>> {
        let mut map = self.keys.write(key);
        self.purge_expired(&mut map, key);

        let entry = match map.get_mut(key) {
            Some(entry) => entry,
            None => return Ok(None),
        };
        let result = f(&mut entry.value)?;

        if entry.value.is_empty_container() {
            map.remove(key);
        }
        Ok(Some(result))
    }

    // ========================================================================
    // STRING AND KEY OPERATIONS
    // ========================================================================

    /// Gets the string value for a key.
    ///
    /// Returns `Ok(None)` if the key doesn't exist or has expired.
    pub fn get(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        self.inspect(key, |value| match value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(StorageError::WrongType),
        })
    }

    /// Sets a string value, replacing whatever the key held before
    /// regardless of its kind. `ttl` of `None` means the key never expires.
    pub fn set(&self, key: Bytes, value: Bytes, ttl: Option<Duration>) {
        let value = Value::String(value);
        let entry = match ttl {
            Some(ttl) => Entry::with_ttl(value, ttl),
            None => Entry::new(value),
        };

        let mut map = self.keys.write(&key);
        map.insert(key, entry);
    }

    /// Deletes a key.
    ///
    /// # Returns
    ///
    /// `true` if a live key was deleted. An expired entry is removed too but
    /// does not count.
    pub fn delete(&self, key: &[u8]) -> bool {
        let mut map = self.keys.write(key);
        if self.purge_expired(&mut map, key) {
            return false;
        }
        map.remove(key).is_some()
    }

    /// Deletes multiple keys, returning how many live keys were removed.
    pub fn delete_many(&self, keys: &[Bytes]) -> u64 {
        keys.iter().filter(|key| self.delete(key)).count() as u64
    }

    /// Remaining time to live for a key, floored to whole seconds.
    pub fn ttl(&self, key: &[u8]) -> Ttl {
        self.read_entry(key, |entry| match entry {
            None => Ttl::Missing,
            Some(entry) => match entry.remaining() {
                None => Ttl::Persistent,
                Some(left) => Ttl::Seconds(left.as_secs()),
            },
        })
    }

    /// The kind of value held at `key`, or None if absent.
    pub fn key_type(&self, key: &[u8]) -> Option<ValueKind> {
        self.read_entry(key, |entry| entry.map(|e| e.value.kind()))
    }

    /// Returns true if a live key exists.
    pub fn exists(&self, key: &[u8]) -> bool {
        self.key_type(key).is_some()
    }

    // ========================================================================
    // LIST OPERATIONS
    // ========================================================================

    /// Inserts `values` as one block at the head of the list, keeping their
    /// given order: `LPUSH k a b c` on an empty key yields `[a, b, c]`.
    /// Creates the list if it doesn't exist.
    ///
    /// # Returns
    /// The length of the list after the push.
    pub fn lpush(&self, key: Bytes, values: Vec<Bytes>) -> StorageResult<usize> {
        self.upsert(
            key,
            || Value::List(VecDeque::new()),
            |value| match value {
                Value::List(list) => {
                    for v in values.into_iter().rev() {
                        list.push_front(v);
                    }
                    Ok(list.len())
                }
                _ => Err(StorageError::WrongType),
            },
        )
    }

    /// Removes and returns the head of a list. The key is deleted when the
    /// last element is popped.
    pub fn lpop(&self, key: &[u8]) -> StorageResult<Option<Bytes>> {
        self.modify(key, |value| match value {
            Value::List(list) => Ok(list.pop_front()),
            _ => Err(StorageError::WrongType),
        })
        .map(Option::flatten)
    }

    /// Returns the elements between `start` and `stop`, both inclusive.
    ///
    /// Negative indices count from the end. Both bounds are then clamped
    /// into `[0, len - 1]`; a start past the end or after stop gives an
    /// empty result.
    pub fn lrange(&self, key: &[u8], start: i64, stop: i64) -> StorageResult<Vec<Bytes>> {
        self.inspect(key, |value| match value {
            Value::List(list) => Ok(match list_range(list.len(), start, stop) {
                Some((from, to)) => list.range(from..=to).cloned().collect(),
                None => Vec::new(),
            }),
            _ => Err(StorageError::WrongType),
        })
        .map(Option::unwrap_or_default)
    }

    // ========================================================================
    // SET OPERATIONS
    // ========================================================================

    /// Adds members to a set, creating it if needed.
    ///
    /// # Returns
    /// The number of members that were not already present.
    pub fn sadd(&self, key: Bytes, members: Vec<Bytes>) -> StorageResult<usize> {
        self.upsert(
            key,
            || Value::Set(HashSet::new()),
            |value| match value {
                Value::Set(set) => Ok(members.into_iter().filter(|m| set.insert(m.clone())).count()),
                _ => Err(StorageError::WrongType),
            },
        )
    }

    /// Returns all members of a set in no particular order.
    pub fn smembers(&self, key: &[u8]) -> StorageResult<Vec<Bytes>> {
        self.inspect(key, |value| match value {
            Value::Set(set) => Ok(set.iter().cloned().collect()),
            _ => Err(StorageError::WrongType),
        })
        .map(Option::unwrap_or_default)
    }

    /// Removes members from a set. The key is deleted once the set is empty.
    ///
    /// # Returns
    /// The number of members removed.
    pub fn srem(&self, key: &[u8], members: &[Bytes]) -> StorageResult<usize> {
        self.modify(key, |value| match value {
            Value::Set(set) => Ok(members.iter().filter(|m| set.remove(*m)).count()),
            _ => Err(StorageError::WrongType),
        })
        .map(Option::unwrap_or_default)
    }

    // ========================================================================
    // HASH OPERATIONS
    // ========================================================================

    /// Sets a hash field, creating the hash if needed.
    ///
    /// # Returns
    /// `true` if the field is new, `false` if an existing value was overwritten.
    pub fn hset(&self, key: Bytes, field: Bytes, value: Bytes) -> StorageResult<bool> {
        self.upsert(
            key,
            || Value::Hash(HashMap::new()),
            |stored| match stored {
                Value::Hash(hash) => Ok(hash.insert(field, value).is_none()),
                _ => Err(StorageError::WrongType),
            },
        )
    }

    /// Gets a hash field.
    pub fn hget(&self, key: &[u8], field: &[u8]) -> StorageResult<Option<Bytes>> {
        self.inspect(key, |value| match value {
            Value::Hash(hash) => Ok(hash.get(field).cloned()),
            _ => Err(StorageError::WrongType),
        })
        .map(Option::flatten)
    }

    /// Removes fields from a hash. The key is deleted once the hash is empty.
    ///
    /// # Returns
    /// The number of fields removed.
    pub fn hdel(&self, key: &[u8], fields: &[Bytes]) -> StorageResult<usize> {
        self.modify(key, |value| match value {
            Value::Hash(hash) => Ok(fields.iter().filter(|f| hash.remove(*f).is_some()).count()),
            _ => Err(StorageError::WrongType),
        })
        .map(Option::unwrap_or_default)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Number of stored entries, including expired ones not yet touched.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> StorageStats {
        StorageStats {
            keys: self.len() as u64,
            expired: self.expired_count.load(Ordering::Relaxed),
        }
    }
}

/// Resolves LRANGE bounds against a list of `len` elements.
fn list_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let n = len as i64;
    let resolve = |index: i64| if index < 0 { n + index } else { index };

    let start = resolve(start).max(0);
    let stop = resolve(stop).max(0).min(n - 1);

    if start > n - 1 || start > stop {
        return None;
    }
    Some((start as usize, stop as usize))
}

/// Keyspace statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorageStats {
    pub keys: u64,
    pub expired: u64,
}
