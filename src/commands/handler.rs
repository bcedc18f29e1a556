//! Command Handler
//!
//! Receives parsed command vectors, validates them, executes them against
//! the keyspace or the leaderboard, and produces exactly one reply each.
//!
//! ## Supported Commands
//!
//! ### String and Key Commands
//! - `GET key` - Get a string value
//! - `SET key value [EX seconds | PX milliseconds]` - Set a string value
//! - `DEL key [key ...]` - Delete keys
//! - `TTL key` - Remaining time to live in seconds
//!
//! ### List Commands
//! - `LPUSH key value [value ...]` - Prepend values as one block, keeping their order
//! - `LPOP key` - Remove and return the first element
//! - `LRANGE key start stop` - Get a range of elements
//!
//! ### Set Commands
//! - `SADD key member [member ...]` - Add members
//! - `SMEMBERS key` - List members
//! - `SREM key member [member ...]` - Remove members
//!
//! ### Hash Commands
//! - `HSET key field value` - Set a field
//! - `HGET key field` - Get a field
//! - `HDEL key field [field ...]` - Remove fields
//!
//! ### Leaderboard Commands
//! - `LBADD user score` - Store a user's score, clamped to [0, 10000]
//! - `LBTOP n` - Top `n` users as `[user, score, ...]`
//!
//! ### Connection
//! - `QUIT` - Reply `+OK` and close the connection
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │  lookup()   │───>│  arity ok?  │───>│ dispatch()  │     │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘     │
//! │                                               │             │
//! │                             ┌─────────────────┴──────┐      │
//! │                             ▼                        ▼      │
//! │                      StorageEngine             Leaderboard  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::protocol::{Command, RespValue};
use crate::storage::{Leaderboard, StorageEngine, StorageError};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors reported to the client as `-ERR ...` replies.
///
/// The `Display` output is exactly the reply text. None of these close the
/// connection or mutate state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),

    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    #[error("ERR WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("ERR value is not an integer or out of range")]
    NotInteger,

    #[error("ERR invalid {0} expiration value")]
    InvalidExpire(&'static str),

    #[error("ERR score must be an integer")]
    InvalidScore,

    #[error("ERR N must be a positive integer")]
    InvalidCount,

    #[error("ERR empty command")]
    Empty,
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::WrongType => CommandError::WrongType,
        }
    }
}

impl From<CommandError> for RespValue {
    fn from(err: CommandError) -> Self {
        RespValue::error(err.to_string())
    }
}

type CommandResult = Result<RespValue, CommandError>;

/// What the connection should do after sending a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Send the reply and keep reading commands
    Reply(RespValue),
    /// Send the reply, then close the connection
    Close(RespValue),
}

impl Outcome {
    pub fn response(&self) -> &RespValue {
        match self {
            Outcome::Reply(value) | Outcome::Close(value) => value,
        }
    }

    pub fn into_response(self) -> RespValue {
        match self {
            Outcome::Reply(value) | Outcome::Close(value) => value,
        }
    }

    pub fn closes_connection(&self) -> bool {
        matches!(self, Outcome::Close(_))
    }
}

/// Name and arity of a supported command.
///
/// Arity counts the command name itself. A positive arity must match
/// exactly; a negative arity `-n` means "at least `n`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub arity: i32,
}

impl CommandSpec {
    pub fn accepts(&self, argc: usize) -> bool {
        let required = self.arity.unsigned_abs() as usize;
        if self.arity < 0 {
            argc >= required
        } else {
            argc == required
        }
    }
}

/// Every command the server understands.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec { name: "GET", arity: 2 },
    CommandSpec { name: "SET", arity: -3 },
    CommandSpec { name: "DEL", arity: -2 },
    CommandSpec { name: "TTL", arity: 2 },
    CommandSpec { name: "LPUSH", arity: -3 },
    CommandSpec { name: "LPOP", arity: 2 },
    CommandSpec { name: "LRANGE", arity: 4 },
    CommandSpec { name: "SADD", arity: -3 },
    CommandSpec { name: "SMEMBERS", arity: 2 },
    CommandSpec { name: "SREM", arity: -3 },
    CommandSpec { name: "HSET", arity: 4 },
    CommandSpec { name: "HGET", arity: 3 },
    CommandSpec { name: "HDEL", arity: -3 },
    CommandSpec { name: "LBADD", arity: 3 },
    CommandSpec { name: "LBTOP", arity: 2 },
    CommandSpec { name: "QUIT", arity: -1 },
];

/// Finds a command by name, ignoring ASCII case.
pub fn lookup(name: &[u8]) -> Option<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|spec| spec.name.as_bytes().eq_ignore_ascii_case(name))
}

/// Executes commands against the shared keyspace and leaderboard.
///
/// Cheap to clone; each connection holds its own copy.
#[derive(Clone)]
pub struct CommandHandler {
    storage: Arc<StorageEngine>,
    leaderboard: Arc<Leaderboard>,
}

impl CommandHandler {
    pub fn new(storage: Arc<StorageEngine>, leaderboard: Arc<Leaderboard>) -> Self {
        Self {
            storage,
            leaderboard,
        }
    }

    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    pub fn leaderboard(&self) -> &Arc<Leaderboard> {
        &self.leaderboard
    }

    /// Executes a command and returns the reply along with whether the
    /// connection should close afterwards.
    ///
    /// # Arguments
    ///
    /// * `command` - The command name followed by its arguments
    pub fn execute(&self, command: Command) -> Outcome {
        let name = match command.first() {
            Some(name) => name,
            None => return Outcome::Reply(CommandError::Empty.into()),
        };

        let spec = match lookup(name) {
            Some(spec) => spec,
            None => {
                let name = String::from_utf8_lossy(name).into_owned();
                return Outcome::Reply(CommandError::UnknownCommand(name).into());
            }
        };

        if !spec.accepts(command.len()) {
            return Outcome::Reply(CommandError::WrongArity(spec.name).into());
        }

        if spec.name == "QUIT" {
            debug!("QUIT received");
            return Outcome::Close(RespValue::ok());
        }

        let reply = self
            .dispatch(spec.name, &command[1..])
            .unwrap_or_else(RespValue::from);
        Outcome::Reply(reply)
    }

    /// Routes a validated command to its handler. `args` excludes the name.
    fn dispatch(&self, name: &str, args: &[Bytes]) -> CommandResult {
        match name {
            "GET" => self.cmd_get(args),
            "SET" => self.cmd_set(args),
            "DEL" => self.cmd_del(args),
            "TTL" => self.cmd_ttl(args),
            "LPUSH" => self.cmd_lpush(args),
            "LPOP" => self.cmd_lpop(args),
            "LRANGE" => self.cmd_lrange(args),
            "SADD" => self.cmd_sadd(args),
            "SMEMBERS" => self.cmd_smembers(args),
            "SREM" => self.cmd_srem(args),
            "HSET" => self.cmd_hset(args),
            "HGET" => self.cmd_hget(args),
            "HDEL" => self.cmd_hdel(args),
            "LBADD" => self.cmd_lbadd(args),
            "LBTOP" => self.cmd_lbtop(args),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    // ========================================================================
    // String and Key Commands
    // ========================================================================

    /// GET key
    fn cmd_get(&self, args: &[Bytes]) -> CommandResult {
        Ok(bulk_or_nil(self.storage.get(&args[0])?))
    }

    /// SET key value [EX seconds | PX milliseconds]
    fn cmd_set(&self, args: &[Bytes]) -> CommandResult {
        // Only the first option pair is read; anything else is ignored
        let ttl = match &args[2..] {
            [option, amount, ..] => parse_expiry(option, amount)?,
            _ => None,
        };

        self.storage.set(args[0].clone(), args[1].clone(), ttl);
        Ok(RespValue::ok())
    }

    /// DEL key [key ...]
    fn cmd_del(&self, args: &[Bytes]) -> CommandResult {
        let deleted = self.storage.delete_many(args);
        Ok(RespValue::integer(deleted as i64))
    }

    /// TTL key
    fn cmd_ttl(&self, args: &[Bytes]) -> CommandResult {
        Ok(RespValue::integer(self.storage.ttl(&args[0]).as_reply()))
    }

    // ========================================================================
    // List Commands
    // ========================================================================

    /// LPUSH key value [value ...]
    fn cmd_lpush(&self, args: &[Bytes]) -> CommandResult {
        let len = self.storage.lpush(args[0].clone(), args[1..].to_vec())?;
        Ok(RespValue::integer(len as i64))
    }

    /// LPOP key
    fn cmd_lpop(&self, args: &[Bytes]) -> CommandResult {
        Ok(bulk_or_nil(self.storage.lpop(&args[0])?))
    }

    /// LRANGE key start stop
    fn cmd_lrange(&self, args: &[Bytes]) -> CommandResult {
        let start = parse_int(&args[1]).ok_or(CommandError::NotInteger)?;
        let stop = parse_int(&args[2]).ok_or(CommandError::NotInteger)?;

        let elements = self.storage.lrange(&args[0], start, stop)?;
        Ok(RespValue::bulk_array(elements))
    }

    // ========================================================================
    // Set Commands
    // ========================================================================

    /// SADD key member [member ...]
    fn cmd_sadd(&self, args: &[Bytes]) -> CommandResult {
        let added = self.storage.sadd(args[0].clone(), args[1..].to_vec())?;
        Ok(RespValue::integer(added as i64))
    }

    /// SMEMBERS key
    fn cmd_smembers(&self, args: &[Bytes]) -> CommandResult {
        Ok(RespValue::bulk_array(self.storage.smembers(&args[0])?))
    }

    /// SREM key member [member ...]
    fn cmd_srem(&self, args: &[Bytes]) -> CommandResult {
        let removed = self.storage.srem(&args[0], &args[1..])?;
        Ok(RespValue::integer(removed as i64))
    }

    // ========================================================================
    // Hash Commands
    // ========================================================================

    /// HSET key field value
    fn cmd_hset(&self, args: &[Bytes]) -> CommandResult {
        let created = self
            .storage
            .hset(args[0].clone(), args[1].clone(), args[2].clone())?;
        Ok(RespValue::integer(i64::from(created)))
    }

    /// HGET key field
    fn cmd_hget(&self, args: &[Bytes]) -> CommandResult {
        Ok(bulk_or_nil(self.storage.hget(&args[0], &args[1])?))
    }

    /// HDEL key field [field ...]
    fn cmd_hdel(&self, args: &[Bytes]) -> CommandResult {
        let removed = self.storage.hdel(&args[0], &args[1..])?;
        Ok(RespValue::integer(removed as i64))
    }

    // ========================================================================
    // Leaderboard Commands
    // ========================================================================

    /// LBADD user score
    fn cmd_lbadd(&self, args: &[Bytes]) -> CommandResult {
        let score = parse_int(&args[1]).ok_or(CommandError::InvalidScore)?;
        self.leaderboard.add(args[0].clone(), score);
        Ok(RespValue::ok())
    }

    /// LBTOP n
    fn cmd_lbtop(&self, args: &[Bytes]) -> CommandResult {
        let n = match parse_int(&args[0]) {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => return Err(CommandError::InvalidCount),
        };

        let flattened = self
            .leaderboard
            .top(n)
            .into_iter()
            .flat_map(|entry| [entry.user, Bytes::from(entry.score.to_string())]);
        Ok(RespValue::bulk_array(flattened))
    }
}

/// Parses a base-10 signed integer argument.
fn parse_int(arg: &[u8]) -> Option<i64> {
    std::str::from_utf8(arg).ok()?.parse().ok()
}

/// Parses the `EX seconds` / `PX milliseconds` option of SET.
///
/// An unrecognised option or a non-positive amount means no expiry.
fn parse_expiry(option: &[u8], amount: &[u8]) -> Result<Option<Duration>, CommandError> {
    let (unit, millis_per_unit) = if option.eq_ignore_ascii_case(b"EX") {
        ("EX", 1000)
    } else if option.eq_ignore_ascii_case(b"PX") {
        ("PX", 1)
    } else {
        return Ok(None);
    };

    let amount = parse_int(amount).ok_or(CommandError::InvalidExpire(unit))?;
    if amount <= 0 {
        return Ok(None);
    }
    Ok(Some(Duration::from_millis(
        (amount as u64).saturating_mul(millis_per_unit),
    )))
}

fn bulk_or_nil(value: Option<Bytes>) -> RespValue {
    match value {
        Some(v) => RespValue::bulk_string(v),
        None => RespValue::null(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_handler() -> CommandHandler {
        CommandHandler::new(Arc::new(StorageEngine::new()), Arc::new(Leaderboard::new()))
    }

    fn make_command(args: &[&str]) -> Command {
        args.iter().map(|s| Bytes::from(s.to_string())).collect()
    }

    fn run(handler: &CommandHandler, args: &[&str]) -> RespValue {
        handler.execute(make_command(args)).into_response()
    }

    fn bulk(s: &str) -> RespValue {
        RespValue::bulk_string(Bytes::from(s.to_string()))
    }

    fn wrongtype() -> RespValue {
        CommandError::WrongType.into()
    }

    #[test]
    fn test_set_get() {
        let handler = create_handler();

        assert_eq!(run(&handler, &["SET", "key", "value"]), RespValue::ok());
        assert_eq!(run(&handler, &["GET", "key"]), bulk("value"));
        assert_eq!(run(&handler, &["GET", "nonexistent"]), RespValue::null());
    }

    #[test]
    fn test_command_names_are_case_insensitive() {
        let handler = create_handler();

        assert_eq!(run(&handler, &["set", "k", "v"]), RespValue::ok());
        assert_eq!(run(&handler, &["GeT", "k"]), bulk("v"));
    }

    #[test]
    fn test_set_with_expiry_options() {
        let handler = create_handler();

        assert_eq!(run(&handler, &["SET", "a", "v", "EX", "100"]), RespValue::ok());
        assert!(matches!(run(&handler, &["TTL", "a"]), RespValue::Integer(99..=100)));

        assert_eq!(run(&handler, &["SET", "b", "v", "px", "5000"]), RespValue::ok());
        assert!(matches!(run(&handler, &["TTL", "b"]), RespValue::Integer(4..=5)));

        // Non-positive durations mean no expiry
        assert_eq!(run(&handler, &["SET", "c", "v", "EX", "0"]), RespValue::ok());
        assert_eq!(run(&handler, &["TTL", "c"]), RespValue::integer(-1));
        assert_eq!(run(&handler, &["SET", "c", "v", "PX", "-10"]), RespValue::ok());
        assert_eq!(run(&handler, &["TTL", "c"]), RespValue::integer(-1));
    }

    #[test]
    fn test_set_bad_options() {
        let handler = create_handler();

        assert_eq!(
            run(&handler, &["SET", "k", "v", "EX", "soon"]),
            RespValue::error("ERR invalid EX expiration value")
        );
        assert_eq!(
            run(&handler, &["SET", "k", "v", "PX", "1.5"]),
            RespValue::error("ERR invalid PX expiration value")
        );
        assert_eq!(run(&handler, &["GET", "k"]), RespValue::null());
    }

    #[test]
    fn test_set_ignores_unknown_and_extra_options() {
        let handler = create_handler();

        assert_eq!(run(&handler, &["SET", "k", "v", "NX", "1"]), RespValue::ok());
        assert_eq!(run(&handler, &["GET", "k"]), bulk("v"));
        assert_eq!(run(&handler, &["TTL", "k"]), RespValue::integer(-1));

        assert_eq!(run(&handler, &["SET", "j", "v", "EX"]), RespValue::ok());
        assert_eq!(run(&handler, &["GET", "j"]), bulk("v"));
        assert_eq!(run(&handler, &["TTL", "j"]), RespValue::integer(-1));

        assert_eq!(
            run(&handler, &["SET", "m", "v", "EX", "100", "PX", "junk", "tail"]),
            RespValue::ok()
        );
        assert!(matches!(run(&handler, &["TTL", "m"]), RespValue::Integer(99..=100)));
    }

    #[test]
    fn test_ttl() {
        let handler = create_handler();

        assert_eq!(run(&handler, &["TTL", "missing"]), RespValue::integer(-2));
        run(&handler, &["SET", "k", "v"]);
        assert_eq!(run(&handler, &["TTL", "k"]), RespValue::integer(-1));
    }

    #[test]
    fn test_del() {
        let handler = create_handler();

        run(&handler, &["SET", "key1", "value1"]);
        run(&handler, &["SADD", "key2", "m"]);

        let response = run(&handler, &["DEL", "key1", "key2", "key3"]);
        assert_eq!(response, RespValue::integer(2));
        assert_eq!(run(&handler, &["GET", "key1"]), RespValue::null());
    }

    #[test]
    fn test_wrongtype_leaves_value() {
        let handler = create_handler();

        run(&handler, &["SET", "k", "v"]);
        assert_eq!(run(&handler, &["LPUSH", "k", "x"]), wrongtype());
        assert_eq!(
            wrongtype(),
            RespValue::error(
                "ERR WRONGTYPE Operation against a key holding the wrong kind of value"
            )
        );
        assert_eq!(run(&handler, &["GET", "k"]), bulk("v"));

        run(&handler, &["HSET", "h", "f", "v"]);
        assert_eq!(run(&handler, &["GET", "h"]), wrongtype());
        assert_eq!(run(&handler, &["SMEMBERS", "h"]), wrongtype());
        assert_eq!(run(&handler, &["LRANGE", "h", "0", "-1"]), wrongtype());
    }

    #[test]
    fn test_list_commands() {
        let handler = create_handler();

        assert_eq!(
            run(&handler, &["LPUSH", "mylist", "a", "b", "c"]),
            RespValue::integer(3)
        );
        assert_eq!(
            run(&handler, &["LRANGE", "mylist", "0", "-1"]),
            RespValue::bulk_array(["a", "b", "c"])
        );
        assert_eq!(run(&handler, &["LPOP", "mylist"]), bulk("a"));
        assert_eq!(run(&handler, &["LPOP", "mylist"]), bulk("b"));
        assert_eq!(run(&handler, &["LPOP", "mylist"]), bulk("c"));
        assert_eq!(run(&handler, &["LPOP", "mylist"]), RespValue::null());
        assert_eq!(
            run(&handler, &["LRANGE", "mylist", "0", "-1"]),
            RespValue::array(vec![])
        );
    }

    #[test]
    fn test_lrange_requires_integers() {
        let handler = create_handler();

        assert_eq!(
            run(&handler, &["LRANGE", "l", "zero", "1"]),
            RespValue::error("ERR value is not an integer or out of range")
        );
    }

    #[test]
    fn test_set_commands() {
        let handler = create_handler();

        assert_eq!(run(&handler, &["SADD", "s", "a", "b", "a"]), RespValue::integer(2));
        assert_eq!(run(&handler, &["SADD", "s", "a"]), RespValue::integer(0));
        assert_eq!(run(&handler, &["SREM", "s", "a", "b"]), RespValue::integer(2));
        assert_eq!(run(&handler, &["SMEMBERS", "s"]), RespValue::array(vec![]));
        assert_eq!(run(&handler, &["SREM", "s", "a"]), RespValue::integer(0));
    }

    #[test]
    fn test_hash_commands() {
        let handler = create_handler();

        assert_eq!(run(&handler, &["HSET", "h", "f", "v"]), RespValue::integer(1));
        assert_eq!(run(&handler, &["HSET", "h", "f", "v2"]), RespValue::integer(0));
        assert_eq!(run(&handler, &["HGET", "h", "f"]), bulk("v2"));
        assert_eq!(run(&handler, &["HGET", "h", "g"]), RespValue::null());
        assert_eq!(run(&handler, &["HDEL", "h", "f", "g"]), RespValue::integer(1));
        assert_eq!(run(&handler, &["HGET", "h", "f"]), RespValue::null());
        assert_eq!(run(&handler, &["TTL", "h"]), RespValue::integer(-2));
    }

    #[test]
    fn test_leaderboard_commands() {
        let handler = create_handler();

        assert_eq!(run(&handler, &["LBADD", "alice", "50"]), RespValue::ok());
        assert_eq!(run(&handler, &["LBADD", "bob", "70"]), RespValue::ok());
        assert_eq!(
            run(&handler, &["LBTOP", "2"]),
            RespValue::bulk_array(["bob", "70", "alice", "50"])
        );

        run(&handler, &["LBADD", "carol", "70"]);
        assert_eq!(
            run(&handler, &["LBTOP", "3"]),
            RespValue::bulk_array(["bob", "70", "carol", "70", "alice", "50"])
        );
    }

    #[test]
    fn test_leaderboard_clamp() {
        let handler = create_handler();

        run(&handler, &["LBADD", "dave", "999999"]);
        assert_eq!(
            run(&handler, &["LBTOP", "1"]),
            RespValue::bulk_array(["dave", "10000"])
        );

        run(&handler, &["LBADD", "eve", "-5"]);
        assert_eq!(
            run(&handler, &["LBTOP", "10"]),
            RespValue::bulk_array(["dave", "10000", "eve", "0"])
        );
    }

    #[test]
    fn test_leaderboard_argument_errors() {
        let handler = create_handler();

        assert_eq!(
            run(&handler, &["LBADD", "alice", "lots"]),
            RespValue::error("ERR score must be an integer")
        );
        assert!(handler.leaderboard().is_empty());

        for n in ["0", "-3", "many"] {
            assert_eq!(
                run(&handler, &["LBTOP", n]),
                RespValue::error("ERR N must be a positive integer")
            );
        }
        assert_eq!(run(&handler, &["LBTOP", "5"]), RespValue::array(vec![]));
    }

    #[test]
    fn test_leaderboard_is_separate_keyspace() {
        let handler = create_handler();

        run(&handler, &["SET", "alice", "string"]);
        assert_eq!(run(&handler, &["LBADD", "alice", "10"]), RespValue::ok());
        assert_eq!(run(&handler, &["GET", "alice"]), bulk("string"));
    }

    #[test]
    fn test_arity_errors() {
        let handler = create_handler();

        assert_eq!(
            run(&handler, &["GET"]),
            RespValue::error("ERR wrong number of arguments for 'GET' command")
        );
        assert_eq!(
            run(&handler, &["get", "a", "b"]),
            RespValue::error("ERR wrong number of arguments for 'GET' command")
        );
        assert_eq!(
            run(&handler, &["HSET", "h", "f"]),
            RespValue::error("ERR wrong number of arguments for 'HSET' command")
        );
        assert_eq!(
            run(&handler, &["LPUSH", "l"]),
            RespValue::error("ERR wrong number of arguments for 'LPUSH' command")
        );
        assert!(handler.storage().is_empty());
    }

    #[test]
    fn test_unknown_command() {
        let handler = create_handler();

        let outcome = handler.execute(make_command(&["FLUSHALL"]));
        assert_eq!(
            outcome,
            Outcome::Reply(RespValue::error("ERR unknown command 'FLUSHALL'"))
        );
    }

    #[test]
    fn test_quit_closes() {
        let handler = create_handler();

        let outcome = handler.execute(make_command(&["quit"]));
        assert!(outcome.closes_connection());
        assert_eq!(outcome.response(), &RespValue::ok());

        let outcome = handler.execute(make_command(&["PING"]));
        assert!(!outcome.closes_connection());
    }

    #[test]
    fn test_command_spec_arity() {
        let get = lookup(b"get").unwrap();
        assert!(get.accepts(2));
        assert!(!get.accepts(1));
        assert!(!get.accepts(3));

        let del = lookup(b"DEL").unwrap();
        assert!(!del.accepts(1));
        assert!(del.accepts(2));
        assert!(del.accepts(10));

        assert!(lookup(b"NOPE").is_none());
    }
}
