//! Module `state`
//!
//! Defines the `Client` struct tracking one connected chat participant:
//! its address, username, write half of the connection, close signal, and
//! last-activity timestamp.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::{Mutex, Notify};

/// Write half of a client connection, shared between the acceptor, the
/// broadcaster, and the idle reaper. The read half stays exclusively owned
/// by the client's session handler.
pub type SharedWriter = Arc<Mutex<OwnedWriteHalf>>;

/// Sends raw bytes through a shared writer, locking it only for this send.
pub async fn send_bytes(writer: &SharedWriter, bytes: &[u8]) -> io::Result<()> {
    let mut guard = writer.lock().await;
    guard.write_all(bytes).await?;
    guard.flush().await
}

/// Represents the state of a connected chat client.
pub struct Client {
    addr: SocketAddr,
    username: String,
    writer: SharedWriter,
    shutdown: Arc<Notify>,
    last_activity: Instant,
}

impl Client {
    /// Creates a client record for a freshly handshaken connection.
    /// `last_activity` starts at now, counting registration as activity.
    pub fn new(
        addr: SocketAddr,
        username: String,
        writer: SharedWriter,
        shutdown: Arc<Notify>,
    ) -> Self {
        Self {
            addr,
            username,
            writer,
            shutdown,
            last_activity: Instant::now(),
        }
    }

    /// Returns the peer address this client is registered under.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the username assigned at handshake completion.
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn writer(&self) -> SharedWriter {
        Arc::clone(&self.writer)
    }

    pub fn shutdown_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// Marks the client as active right now.
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Consumes the record, yielding the username. Used on removal, where
    /// the username is all the caller still needs.
    pub fn into_username(self) -> String {
        self.username
    }
}
