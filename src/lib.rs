//! # scorekv - An In-Memory Data Server with a Score Leaderboard
//!
//! scorekv speaks a subset of the Redis wire protocol over TCP. It keeps a
//! typed keyspace (strings, lists, sets and hashes with optional expiry) and,
//! alongside it, an independent leaderboard of user scores ranked on demand.
//!
//! ## Features
//!
//! - **RESP and inline requests**: `redis-cli` and `telnet` both work
//! - **Typed values**: a key keeps its kind until deleted or expired
//! - **Lazy TTL**: an expired key is dropped the first time it is touched
//! - **Leaderboard**: clamped integer scores, deterministic top-N ranking
//! - **Async I/O**: one Tokio task per client over a sharded, lock-per-shard store
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              scorekv                                    │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │   Server    │───>│ Connection  │───>│  Command    │                  │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │                  │
//! │  └─────────────┘    └──────┬──────┘    └──────┬──────┘                  │
//! │                            │                  │                         │
//! │                            ▼                  ▼                         │
//! │  ┌─────────────┐    ┌──────────────────────────────────────────────┐   │
//! │  │   RESP      │    │              StorageEngine                   │   │
//! │  │   Parser    │    │  ┌────────┐ ┌────────┐ ┌────────┐ ┌────────┐ │   │
//! │  │             │    │  │Shard 0 │ │Shard 1 │ │Shard 2 │ │...64   │ │   │
//! │  └─────────────┘    │  │RwLock  │ │RwLock  │ │RwLock  │ │shards  │ │   │
//! │                     │  └────────┘ └────────┘ └────────┘ └────────┘ │   │
//! │                     └──────────────────────────────────────────────┘   │
//! │                     ┌──────────────────────────────────────────────┐   │
//! │                     │     Leaderboard (user id → score, sharded)   │   │
//! │                     └──────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use scorekv::server::Server;
//! use scorekv::storage::{Leaderboard, StorageEngine};
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let server = Server::new(Arc::new(StorageEngine::new()), Arc::new(Leaderboard::new()));
//!     let listener = TcpListener::bind("127.0.0.1:6379").await?;
//!     server.run(listener).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Commands
//!
//! - Strings and keys: `GET`, `SET key value [EX s | PX ms]`, `DEL`, `TTL`
//! - Lists: `LPUSH`, `LPOP`, `LRANGE`
//! - Sets: `SADD`, `SMEMBERS`, `SREM`
//! - Hashes: `HSET`, `HGET`, `HDEL`
//! - Leaderboard: `LBADD user score`, `LBTOP n`
//! - Connection: `QUIT`
//!
//! ## Module Overview
//!
//! - [`protocol`]: request parser and reply encoder
//! - [`storage`]: the keyspace and the leaderboard
//! - [`commands`]: command table and dispatch
//! - [`connection`]: per-client request loop
//! - [`server`]: accept loop
//! - [`config`]: command-line options
//!
//! ## Design Highlights
//!
//! ### Per-key atomicity
//!
//! Every read-modify-write on a key runs under the write lock of the shard
//! that owns it, so concurrent `SADD`s or `LPUSH`es on one key never lose
//! elements, while keys in other shards proceed in parallel.
//!
//! ### Lazy expiry
//!
//! There is no background sweeper. Each access checks the deadline first and
//! removes the key if it has passed, so an expired key is never observable.

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod server;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::CommandHandler;
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{ParseError, RespParser, RespValue};
pub use server::Server;
pub use storage::{Leaderboard, StorageEngine};

/// The default port scorekv listens on (same as Redis)
pub const DEFAULT_PORT: u16 = 6379;

/// The port of the alternate deployment, selected with `--alt-port`
pub const ALT_PORT: u16 = 6380;

/// The default host scorekv binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of scorekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
