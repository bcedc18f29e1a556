//! Storage Module
//!
//! The two process-wide data structures of scorekv:
//!
//! - [`StorageEngine`]: the typed keyspace (string, list, set, hash) with lazy TTL expiry
//! - [`Leaderboard`]: an independent user → score map with clamped scores and ranking
//!
//! Both sit on a sharded `RwLock<HashMap>` so that different keys proceed in
//! parallel while each key's read-modify-write is serialized.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     StorageEngine                           │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐           │
//! │  │ Shard 0 │ │ Shard 1 │ │ Shard 2 │ │...64    │           │
//! │  │ RwLock  │ │ RwLock  │ │ RwLock  │ │ shards  │           │
//! │  └─────────┘ └─────────┘ └─────────┘ └─────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Leaderboard                            │
//! │            (same sharding, user id → score)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use scorekv::storage::{Leaderboard, StorageEngine, Ttl};
//! use bytes::Bytes;
//! use std::time::Duration;
//!
//! let engine = StorageEngine::new();
//! engine.set(Bytes::from("session"), Bytes::from("token123"), Some(Duration::from_secs(3600)));
//! assert!(matches!(engine.ttl(b"session"), Ttl::Seconds(_)));
//!
//! let board = Leaderboard::new();
//! assert_eq!(board.add(Bytes::from("dave"), 999_999), 10_000);
//! ```

pub mod engine;
pub mod leaderboard;
mod shard;
pub mod value;

pub use engine::{StorageEngine, StorageError, StorageResult, StorageStats, Ttl};
pub use leaderboard::{Leaderboard, RankedEntry, MAX_SCORE, MIN_SCORE};
pub use shard::NUM_SHARDS;
pub use value::{Entry, Value, ValueKind};
