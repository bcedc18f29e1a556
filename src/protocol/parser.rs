//! Incremental Request Parser
//!
//! Turns a raw byte stream into command vectors. Each request is framed one
//! of two ways, decided by its first byte:
//!
//! - `*` starts an array of bulk strings: `*<count>\r\n` followed by `count`
//!   elements of the form `$<len>\r\n<len bytes>\r\n`.
//! - anything else is an inline command: one text line tokenized on unquoted
//!   spaces, where `"` toggles quoting and is dropped from the token.
//!
//! The parser never blocks and never consumes a partial request. It returns:
//! - `Ok(Some((args, consumed)))` - a full request; the caller advances by `consumed`
//! - `Ok(None)` - more bytes are needed
//! - `Err(ParseError)` - the stream is malformed and the connection must close
//!
//! An empty `args` vector means "no command" (a blank inline line or `*0`).

use crate::protocol::types::prefix;
use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur while framing a request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// A count or length header was not a decimal integer
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// `*<count>` was negative
    #[error("invalid multibulk length: {0}")]
    InvalidArrayLength(i64),

    /// `$<len>` was negative
    #[error("invalid bulk length: {0}")]
    InvalidBulkLength(i64),

    /// An array element did not start with `$`
    #[error("expected '$', got {0:#04x}")]
    ExpectedBulkString(u8),

    /// A bulk string exceeds the maximum allowed size
    #[error("bulk string too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// An inline line ran past the maximum length without a terminator
    #[error("inline request too long (max: {0} bytes)")]
    InlineTooLong(usize),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A parsed request: the command name followed by its arguments.
pub type Command = Vec<Bytes>;

/// Maximum size for a single bulk string (512 MB, same as Redis)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum length of an inline request line
pub const MAX_INLINE_SIZE: usize = 64 * 1024;

/// Largest element count accepted in an array header. Bounds the up-front
/// allocation for a header whose elements have not arrived yet.
const MAX_PREALLOC: usize = 1024;

/// A stateless request parser.
///
/// # Example
///
/// ```
/// use scorekv::protocol::RespParser;
///
/// let parser = RespParser::new();
/// let buf = b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n";
/// let (args, consumed) = parser.parse(buf).unwrap().unwrap();
/// assert_eq!(args, vec!["GET", "name"]);
/// assert_eq!(consumed, buf.len());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct RespParser;

impl RespParser {
    pub fn new() -> Self {
        Self
    }

    /// Attempts to parse one request from the front of `buf`.
    pub fn parse(&self, buf: &[u8]) -> ParseResult<Option<(Command, usize)>> {
        match buf.first() {
            None => Ok(None),
            Some(&prefix::ARRAY) => self.parse_array(buf),
            Some(_) => self.parse_inline(buf),
        }
    }

    /// Parses `*<count>\r\n` followed by `count` bulk strings.
    fn parse_array(&self, buf: &[u8]) -> ParseResult<Option<(Command, usize)>> {
        let (count, mut consumed) = match read_header(&buf[1..])? {
            Some((count, used)) => (count, 1 + used),
            None => return Ok(None),
        };

        if count < 0 {
            return Err(ParseError::InvalidArrayLength(count));
        }
        let count = count as usize;

        let mut args = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            match self.parse_bulk(&buf[consumed..])? {
                Some((arg, used)) => {
                    args.push(arg);
                    consumed += used;
                }
                None => return Ok(None),
            }
        }

        Ok(Some((args, consumed)))
    }

    /// Parses `$<len>\r\n<len bytes>` plus the two terminator bytes, which
    /// are skipped without inspection.
    fn parse_bulk(&self, buf: &[u8]) -> ParseResult<Option<(Bytes, usize)>> {
        let first = match buf.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        if first != prefix::BULK_STRING {
            return Err(ParseError::ExpectedBulkString(first));
        }

        let (length, header_len) = match read_header(&buf[1..])? {
            Some(parsed) => parsed,
            None => return Ok(None),
        };

        if length < 0 {
            return Err(ParseError::InvalidBulkLength(length));
        }
        let length = length as usize;
        if length > MAX_BULK_SIZE {
            return Err(ParseError::MessageTooLarge {
                size: length,
                max: MAX_BULK_SIZE,
            });
        }

        let data_start = 1 + header_len;
        let total = data_start + length + 2;
        if buf.len() < total {
            return Ok(None);
        }

        let data = Bytes::copy_from_slice(&buf[data_start..data_start + length]);
        Ok(Some((data, total)))
    }

    /// Parses a single inline text line.
    fn parse_inline(&self, buf: &[u8]) -> ParseResult<Option<(Command, usize)>> {
        let (line, consumed) = match read_line(buf) {
            Some(found) => found,
            None if buf.len() > MAX_INLINE_SIZE => {
                return Err(ParseError::InlineTooLong(MAX_INLINE_SIZE))
            }
            None => return Ok(None),
        };

        Ok(Some((tokenize_inline(line), consumed)))
    }
}

/// Splits an inline line on unquoted spaces. A `"` toggles quoting and is
/// not part of any token; empty tokens are dropped.
pub fn tokenize_inline(line: &[u8]) -> Command {
    let mut parts = Vec::new();
    let mut current = Vec::new();
    let mut in_quote = false;

    for &b in line {
        match b {
            b' ' if !in_quote => {
                if !current.is_empty() {
                    parts.push(Bytes::from(std::mem::take(&mut current)));
                }
            }
            b'"' => in_quote = !in_quote,
            _ => current.push(b),
        }
    }
    if !current.is_empty() {
        parts.push(Bytes::from(current));
    }

    parts
}

/// Finds the next line. Returns the line without its terminator and the
/// number of bytes consumed including the terminator. Lines end at `\n`; one
/// trailing `\r` is stripped.
fn read_line(buf: &[u8]) -> Option<(&[u8], usize)> {
    let newline = buf.iter().position(|&b| b == b'\n')?;
    let line = &buf[..newline];
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    Some((line, newline + 1))
}

/// Reads a decimal header line such as the `3` in `*3\r\n`.
fn read_header(buf: &[u8]) -> ParseResult<Option<(i64, usize)>> {
    let (line, consumed) = match read_line(buf) {
        Some(found) => found,
        None => return Ok(None),
    };

    let text = String::from_utf8_lossy(line);
    let n = text
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidInteger(text.into_owned()))?;
    Ok(Some((n, consumed)))
}

/// Helper function to parse a single request from bytes.
pub fn parse_message(buf: &[u8]) -> ParseResult<Option<(Command, usize)>> {
    RespParser::new().parse(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Command {
        parts.iter().map(|s| Bytes::from(s.to_string())).collect()
    }

    #[test]
    fn test_parse_array() {
        let input = b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n";
        let (cmd, consumed) = parse_message(input).unwrap().unwrap();
        assert_eq!(cmd, args(&["GET", "name"]));
        assert_eq!(consumed, 23);
    }

    #[test]
    fn test_parse_array_incomplete() {
        let full = b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$5\r\nvalue\r\n";
        for cut in 0..full.len() {
            assert!(
                parse_message(&full[..cut]).unwrap().is_none(),
                "prefix of {} bytes should be incomplete",
                cut
            );
        }
        assert!(parse_message(full).unwrap().is_some());
    }

    #[test]
    fn test_parse_leaves_following_request() {
        let input = b"*1\r\n$4\r\nQUIT\r\n*1\r\n$4\r\nQUIT\r\n";
        let (_, consumed) = parse_message(input).unwrap().unwrap();
        assert_eq!(consumed, 14);
        let (cmd, _) = parse_message(&input[consumed..]).unwrap().unwrap();
        assert_eq!(cmd, args(&["QUIT"]));
    }

    #[test]
    fn test_binary_safe_bulk_string() {
        let input = b"*2\r\n$3\r\nGET\r\n$7\r\na\r\nb\x00 c\r\n";
        let (cmd, _) = parse_message(input).unwrap().unwrap();
        assert_eq!(cmd[1], Bytes::from(&b"a\r\nb\x00 c"[..]));
    }

    #[test]
    fn test_empty_bulk_string() {
        let input = b"*2\r\n$3\r\nGET\r\n$0\r\n\r\n";
        let (cmd, consumed) = parse_message(input).unwrap().unwrap();
        assert_eq!(cmd, args(&["GET", ""]));
        assert_eq!(consumed, input.len());
    }

    #[test]
    fn test_empty_array_is_no_command() {
        let (cmd, consumed) = parse_message(b"*0\r\n").unwrap().unwrap();
        assert!(cmd.is_empty());
        assert_eq!(consumed, 4);
    }

    #[test]
    fn test_invalid_count() {
        assert!(matches!(
            parse_message(b"*abc\r\n"),
            Err(ParseError::InvalidInteger(_))
        ));
        assert_eq!(
            parse_message(b"*-1\r\n"),
            Err(ParseError::InvalidArrayLength(-1))
        );
    }

    #[test]
    fn test_element_must_be_bulk() {
        assert_eq!(
            parse_message(b"*1\r\n:5\r\n"),
            Err(ParseError::ExpectedBulkString(b':'))
        );
    }

    #[test]
    fn test_invalid_bulk_length() {
        assert!(matches!(
            parse_message(b"*1\r\n$x\r\n"),
            Err(ParseError::InvalidInteger(_))
        ));
        assert_eq!(
            parse_message(b"*1\r\n$-5\r\n"),
            Err(ParseError::InvalidBulkLength(-5))
        );
    }

    #[test]
    fn test_bulk_too_large() {
        let input = format!("*1\r\n${}\r\n", MAX_BULK_SIZE + 1);
        assert!(matches!(
            parse_message(input.as_bytes()),
            Err(ParseError::MessageTooLarge { .. })
        ));
    }

    #[test]
    fn test_parse_inline() {
        let (cmd, consumed) = parse_message(b"SET name Dana\r\n").unwrap().unwrap();
        assert_eq!(cmd, args(&["SET", "name", "Dana"]));
        assert_eq!(consumed, 15);
    }

    #[test]
    fn test_parse_inline_bare_newline() {
        let (cmd, consumed) = parse_message(b"GET k\n").unwrap().unwrap();
        assert_eq!(cmd, args(&["GET", "k"]));
        assert_eq!(consumed, 6);
    }

    #[test]
    fn test_parse_inline_quotes() {
        let (cmd, _) = parse_message(b"SET greeting \"hello world\"\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(cmd, args(&["SET", "greeting", "hello world"]));

        // Quotes can open mid-token and are always stripped
        let (cmd, _) = parse_message(b"SET k a\"b c\"d\r\n").unwrap().unwrap();
        assert_eq!(cmd, args(&["SET", "k", "ab cd"]));
    }

    #[test]
    fn test_parse_inline_collapses_spaces() {
        let (cmd, _) = parse_message(b"  LPUSH   l  a  \r\n").unwrap().unwrap();
        assert_eq!(cmd, args(&["LPUSH", "l", "a"]));
    }

    #[test]
    fn test_parse_inline_empty_line() {
        let (cmd, consumed) = parse_message(b"\r\n").unwrap().unwrap();
        assert!(cmd.is_empty());
        assert_eq!(consumed, 2);

        // A pair of empty quotes yields no token either
        let (cmd, _) = parse_message(b"\"\"\r\n").unwrap().unwrap();
        assert!(cmd.is_empty());
    }

    #[test]
    fn test_parse_inline_incomplete() {
        assert!(parse_message(b"GET na").unwrap().is_none());
    }

    #[test]
    fn test_parse_inline_too_long() {
        let input = vec![b'a'; MAX_INLINE_SIZE + 1];
        assert_eq!(
            parse_message(&input),
            Err(ParseError::InlineTooLong(MAX_INLINE_SIZE))
        );
    }
}
