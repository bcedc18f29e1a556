//! Command Dispatch Module
//!
//! Receives parsed command vectors, checks them against the command table,
//! executes them against the storage engine or the leaderboard, and returns
//! the reply.
//!
//! ## Architecture
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  RESP Parser    │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Lookup       │
//! │  - Check arity  │
//! │  - Execute      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────┐
//! │ StorageEngine / Leaderboard │  (storage module)
//! └─────────────────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - Strings and keys: `GET`, `SET`, `DEL`, `TTL`
//! - Lists: `LPUSH`, `LPOP`, `LRANGE`
//! - Sets: `SADD`, `SMEMBERS`, `SREM`
//! - Hashes: `HSET`, `HGET`, `HDEL`
//! - Leaderboard: `LBADD`, `LBTOP`
//! - Connection: `QUIT`

pub mod handler;

pub use handler::{lookup, CommandError, CommandHandler, CommandSpec, Outcome, COMMANDS};
