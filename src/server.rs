//! TCP accept loop.
//!
//! [`Server`] owns the process-wide state (keyspace, leaderboard and
//! connection statistics) and hands each accepted client to its own task.

use crate::commands::CommandHandler;
use crate::connection::{handle_connection, ConnectionStats};
use crate::storage::{Leaderboard, StorageEngine};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Shared server state plus the accept loop.
///
/// # Example
///
/// ```no_run
/// use scorekv::server::Server;
/// use scorekv::storage::{Leaderboard, StorageEngine};
/// use std::sync::Arc;
/// use tokio::net::TcpListener;
///
/// # async fn demo() -> std::io::Result<()> {
/// let server = Server::new(Arc::new(StorageEngine::new()), Arc::new(Leaderboard::new()));
/// let listener = TcpListener::bind("127.0.0.1:6379").await?;
/// server.run(listener).await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Server {
    storage: Arc<StorageEngine>,
    leaderboard: Arc<Leaderboard>,
    stats: Arc<ConnectionStats>,
}

impl Server {
    pub fn new(storage: Arc<StorageEngine>, leaderboard: Arc<Leaderboard>) -> Self {
        Self {
            storage,
            leaderboard,
            stats: Arc::new(ConnectionStats::new()),
        }
    }

    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    /// The shared leaderboard. Out-of-band viewers use its read-only
    /// [`Leaderboard::ranked`] snapshot.
    pub fn leaderboard(&self) -> &Arc<Leaderboard> {
        &self.leaderboard
    }

    pub fn stats(&self) -> &Arc<ConnectionStats> {
        &self.stats
    }

    /// Accepts connections forever, spawning one task per client.
    ///
    /// A failed `accept` is logged and does not stop the loop. Run it inside
    /// `tokio::select!` to stop on a shutdown signal.
    pub async fn run(&self, listener: TcpListener) {
        if let Ok(addr) = listener.local_addr() {
            info!(addr = %addr, "Accepting connections");
        }

        let handler = CommandHandler::new(Arc::clone(&self.storage), Arc::clone(&self.leaderboard));

        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    debug!(client = %addr, "Accepted connection");

                    if let Err(e) = stream.set_nodelay(true) {
                        debug!(client = %addr, error = %e, "Failed to set TCP_NODELAY");
                    }

                    let handler = handler.clone();
                    let stats = Arc::clone(&self.stats);

                    tokio::spawn(async move {
                        handle_connection(stream, addr, handler, stats).await;
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn start() -> (std::net::SocketAddr, Server) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = Server::new(Arc::new(StorageEngine::new()), Arc::new(Leaderboard::new()));

        let running = server.clone();
        tokio::spawn(async move { running.run(listener).await });

        (addr, server)
    }

    #[tokio::test]
    async fn test_clients_share_state() {
        let (addr, server) = start().await;

        let mut first = TcpStream::connect(addr).await.unwrap();
        first.write_all(b"LBADD alice 50\r\n").await.unwrap();
        let mut buf = [0u8; 64];
        let n = first.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"+OK\r\n");

        let mut second = TcpStream::connect(addr).await.unwrap();
        second.write_all(b"LBTOP 1\r\n").await.unwrap();
        let n = second.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"*2\r\n$5\r\nalice\r\n$2\r\n50\r\n");

        assert_eq!(server.leaderboard().get(b"alice"), Some(50));
        assert_eq!(server.leaderboard().ranked().len(), 1);
    }

    #[tokio::test]
    async fn test_idle_client_does_not_block_others() {
        let (addr, server) = start().await;

        // Half a command, never completed
        let mut idle = TcpStream::connect(addr).await.unwrap();
        idle.write_all(b"*2\r\n$3\r\nGET").await.unwrap();

        let mut active = TcpStream::connect(addr).await.unwrap();
        active.write_all(b"SET k v\r\n").await.unwrap();
        let mut buf = [0u8; 16];
        let n = tokio::time::timeout(Duration::from_secs(2), active.read(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&buf[..n], b"+OK\r\n");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(server.stats().active_connections.load(Ordering::Relaxed), 2);
    }
}
