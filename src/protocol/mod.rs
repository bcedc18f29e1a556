//! RESP Protocol Codec
//!
//! Request decoding and reply encoding for the Redis Serialization Protocol
//! (RESP), plus the inline-command fallback.
//!
//! ## Modules
//!
//! - `types`: the `RespValue` reply enum and its wire serialization
//! - `parser`: incremental request parser producing command vectors
//!
//! ## Example
//!
//! ```
//! use scorekv::protocol::{parse_message, RespValue};
//! use bytes::Bytes;
//!
//! // Decoding a request
//! let data = b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n";
//! let (args, consumed) = parse_message(data).unwrap().unwrap();
//! assert_eq!(args.len(), 2);
//! assert_eq!(consumed, data.len());
//!
//! // Encoding a reply
//! let reply = RespValue::bulk_string(Bytes::from("Dana"));
//! assert_eq!(reply.serialize(), b"$4\r\nDana\r\n");
//! ```

pub mod parser;
pub mod types;

pub use parser::{parse_message, Command, ParseError, ParseResult, RespParser};
pub use types::RespValue;
