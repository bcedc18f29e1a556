//! Connection Handler Module
//!
//! Runs the request loop for one client. Each client gets its own task that
//! reads bytes, parses as many complete commands as are buffered, and writes
//! one reply per command in the order the commands arrived.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! 1. Client connects
//!        │
//!        ▼
//! 2. ConnectionHandler spawned
//!        │
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │      Main Loop               │
//!    │                              │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Parse buffered commands │◄├──┐
//!    │  └───────────┬─────────────┘ │  │
//!    │              ▼               │  │
//!    │  ┌─────────────────────────┐ │  │
//!    │  │ Execute, queue replies  │ │  │
//!    │  └───────────┬─────────────┘ │  │
//!    │              ▼               │  │
//!    │  ┌─────────────────────────┐ │  │
//!    │  │ Flush, read more bytes  │─├──┘
//!    │  └─────────────────────────┘ │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 4. EOF, reset, QUIT, protocol error or full buffer
//!        │
//!        ▼
//! 5. Handler task ends
//! ```
//!
//! ## Buffer Management
//!
//! Incoming bytes accumulate in a `BytesMut`. A read may deliver half a
//! command or several commands at once, so parsing always works on whatever
//! is buffered and only consumes complete frames.

use crate::commands::{CommandHandler, Outcome};
use crate::protocol::parser::{MAX_BULK_SIZE, MAX_INLINE_SIZE};
use crate::protocol::{Command, ParseError, RespParser, RespValue};
use bytes::{Buf, BytesMut};
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, info, trace, warn};

/// Largest amount of unparsed data held for one client: one maximal bulk
/// string plus a maximal inline line of headroom.
pub const MAX_BUFFER_SIZE: usize = MAX_BULK_SIZE + MAX_INLINE_SIZE;

/// Initial buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// Statistics for connection handling
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Total commands processed
    pub commands_processed: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Errors that end a connection abnormally.
///
/// A clean EOF, a connection reset and QUIT are not errors.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Malformed request framing. The connection is closed without a reply.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    /// Buffer size limit exceeded
    #[error("Buffer size limit exceeded ({0} bytes)")]
    BufferFull(usize),
}

/// Why the main loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shutdown {
    /// Peer closed its side, possibly mid-frame
    Eof,
    /// Peer reset the connection
    Reset,
    /// Peer sent QUIT
    Quit,
}

/// Handles a single client connection.
///
/// Generic over the transport so the loop can run over a `TcpStream` in
/// production and an in-memory mock in tests.
pub struct ConnectionHandler<S> {
    stream: BufWriter<S>,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// Bytes read but not yet parsed
    buffer: BytesMut,

    command_handler: CommandHandler,

    parser: RespParser,

    /// Connection statistics (shared)
    stats: Arc<ConnectionStats>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new connection handler.
    ///
    /// # Arguments
    ///
    /// * `stream` - The client transport
    /// * `addr` - The client's socket address
    /// * `command_handler` - The command handler for executing commands
    /// * `stats` - Shared connection statistics
    pub fn new(
        stream: S,
        addr: SocketAddr,
        command_handler: CommandHandler,
        stats: Arc<ConnectionStats>,
    ) -> Self {
        stats.connection_opened();

        Self {
            stream: BufWriter::new(stream),
            addr,
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            command_handler,
            parser: RespParser::new(),
            stats,
        }
    }

    /// Runs the connection until the client leaves or an error occurs.
    ///
    /// Returns `Ok(())` for every normal ending: EOF, reset or QUIT.
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        info!(client = %self.addr, "Client connected");

        let result = self.main_loop().await;

        match &result {
            Ok(Shutdown::Quit) => info!(client = %self.addr, "Client sent QUIT"),
            Ok(Shutdown::Eof) => info!(client = %self.addr, "Client disconnected"),
            Ok(Shutdown::Reset) => debug!(client = %self.addr, "Connection reset by client"),
            Err(e) => warn!(client = %self.addr, error = %e, "Closing connection"),
        }

        self.stats.connection_closed();
        result.map(|_| ())
    }

    /// The main read-execute-respond loop.
    async fn main_loop(&mut self) -> Result<Shutdown, ConnectionError> {
        loop {
            loop {
                let command = match self.try_parse_command() {
                    Ok(Some(command)) => command,
                    Ok(None) => break,
                    Err(e) => {
                        // Replies to commands that already ran still go out
                        self.stream.flush().await?;
                        return Err(e);
                    }
                };
                if command.is_empty() {
                    continue;
                }

                let outcome = self.command_handler.execute(command);
                self.stats.command_processed();

                match outcome {
                    Outcome::Reply(response) => self.queue_response(&response).await?,
                    Outcome::Close(response) => {
                        self.queue_response(&response).await?;
                        self.stream.flush().await?;
                        return Ok(Shutdown::Quit);
                    }
                }
            }

            self.stream.flush().await?;

            if let Some(shutdown) = self.read_more_data().await? {
                return Ok(shutdown);
            }
        }
    }

    /// Attempts to parse a command from the buffer.
    fn try_parse_command(&mut self) -> Result<Option<Command>, ConnectionError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        match self.parser.parse(&self.buffer)? {
            Some((command, consumed)) => {
                self.buffer.advance(consumed);
                trace!(
                    client = %self.addr,
                    consumed = consumed,
                    remaining = self.buffer.len(),
                    "Parsed command"
                );
                Ok(Some(command))
            }
            None => {
                trace!(
                    client = %self.addr,
                    buffered = self.buffer.len(),
                    "Incomplete command, need more data"
                );
                Ok(None)
            }
        }
    }

    /// Reads more data from the transport into the buffer.
    ///
    /// Returns `Some` when the peer has gone away.
    async fn read_more_data(&mut self) -> Result<Option<Shutdown>, ConnectionError> {
        if self.buffer.len() >= MAX_BUFFER_SIZE {
            return Err(ConnectionError::BufferFull(self.buffer.len()));
        }

        if self.buffer.capacity() - self.buffer.len() < 1024 {
            self.buffer.reserve(INITIAL_BUFFER_SIZE);
        }

        let n = match self.stream.get_mut().read_buf(&mut self.buffer).await {
            Ok(n) => n,
            Err(e) if is_reset(&e) => return Ok(Some(Shutdown::Reset)),
            Err(e) => return Err(e.into()),
        };

        if n == 0 {
            if !self.buffer.is_empty() {
                debug!(
                    client = %self.addr,
                    discarded = self.buffer.len(),
                    "EOF inside a partial command"
                );
            }
            return Ok(Some(Shutdown::Eof));
        }

        self.stats.bytes_read(n);
        trace!(client = %self.addr, bytes = n, "Read data");

        Ok(None)
    }

    /// Serializes a reply into the write buffer. Replies go out on the next
    /// flush, which happens before the loop waits for more input.
    async fn queue_response(&mut self, response: &RespValue) -> Result<(), ConnectionError> {
        let bytes = response.serialize();
        self.stream.write_all(&bytes).await?;
        self.stats.bytes_written(bytes.len());
        trace!(
            client = %self.addr,
            bytes = bytes.len(),
            error = response.is_error(),
            "Queued response"
        );
        Ok(())
    }
}

fn is_reset(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted | io::ErrorKind::BrokenPipe
    )
}

/// Handles a client connection.
///
/// Creates a [`ConnectionHandler`] and runs it to completion. The handler
/// logs the reason a connection ended, so an error here needs no further
/// handling.
///
/// # Arguments
///
/// * `stream` - The client transport
/// * `addr` - The client's socket address
/// * `command_handler` - The command handler for executing commands
/// * `stats` - Shared connection statistics
pub async fn handle_connection<S>(
    stream: S,
    addr: SocketAddr,
    command_handler: CommandHandler,
    stats: Arc<ConnectionStats>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let handler = ConnectionHandler::new(stream, addr, command_handler, stats);
    if let Err(e) = handler.run().await {
        debug!(client = %addr, error = %e, "Connection task finished with error");
    }
}
