//! Typed values held by the keyspace.

use bytes::Bytes;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

/// The kind of a stored value. Fixed for the lifetime of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    List,
    Set,
    Hash,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Set => "set",
            ValueKind::Hash => "hash",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(Bytes),
    /// Front of the deque is the head of the list
    List(VecDeque<Bytes>),
    Set(HashSet<Bytes>),
    Hash(HashMap<Bytes, Bytes>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Set(_) => ValueKind::Set,
            Value::Hash(_) => ValueKind::Hash,
        }
    }

    /// True for a container with no elements. Strings are never empty in
    /// this sense, even when zero-length.
    pub fn is_empty_container(&self) -> bool {
        match self {
            Value::String(_) => false,
            Value::List(list) => list.is_empty(),
            Value::Set(set) => set.is_empty(),
            Value::Hash(hash) => hash.is_empty(),
        }
    }
}

/// A stored value with optional expiry time.
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: Value,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// Creates a new entry without expiry.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates a new entry that expires `ttl` from now. A deadline too far
    /// out to represent is treated as no expiry.
    pub fn with_ttl(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    /// Checks if this entry has expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| Instant::now() >= exp)
            .unwrap_or(false)
    }

    /// Remaining lifetime, or None if the entry never expires.
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|exp| exp.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(Value::String(Bytes::from("v")).kind(), ValueKind::String);
        assert_eq!(Value::List(VecDeque::new()).kind(), ValueKind::List);
        assert_eq!(ValueKind::Hash.to_string(), "hash");
    }

    #[test]
    fn test_empty_container() {
        assert!(!Value::String(Bytes::new()).is_empty_container());
        assert!(Value::Set(HashSet::new()).is_empty_container());

        let mut hash = HashMap::new();
        hash.insert(Bytes::from("f"), Bytes::from("v"));
        assert!(!Value::Hash(hash).is_empty_container());
    }

    #[test]
    fn test_expiry() {
        let entry = Entry::new(Value::String(Bytes::from("v")));
        assert!(!entry.is_expired());
        assert_eq!(entry.remaining(), None);

        let entry = Entry::with_ttl(Value::String(Bytes::from("v")), Duration::from_secs(60));
        assert!(!entry.is_expired());
        assert!(entry.remaining().unwrap() <= Duration::from_secs(60));

        let entry = Entry::with_ttl(Value::String(Bytes::from("v")), Duration::ZERO);
        assert!(entry.is_expired());

        let entry = Entry::with_ttl(Value::String(Bytes::from("v")), Duration::MAX);
        assert_eq!(entry.expires_at, None);
    }
}
