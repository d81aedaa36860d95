//! Client registry
//!
//! The authoritative shared table of currently connected clients, guarded
//! by a single mutex. The lock is held only for map reads and mutations;
//! all network sends happen against snapshots taken after it is released.

use log::warn;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::client::state::{Client, SharedWriter};

/// Point-in-time copy of one registry entry, safe to iterate and send to
/// outside the registry lock.
#[derive(Clone)]
pub struct ClientSnapshot {
    pub addr: SocketAddr,
    pub username: String,
    pub writer: SharedWriter,
    pub last_activity: Instant,
}

/// Registry for tracking active clients
pub struct ClientRegistry {
    clients: Mutex<HashMap<SocketAddr, Client>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Adds a client. The address must not already be registered; a
    /// replaced entry is logged and dropped.
    pub async fn register(&self, client: Client) {
        let mut clients = self.clients.lock().await;
        if let Some(previous) = clients.insert(client.addr(), client) {
            warn!(
                "Replaced existing registration for {} ('{}')",
                previous.addr(),
                previous.username()
            );
        }
    }

    /// Refreshes a client's last-activity timestamp. No-op if the client
    /// is absent (it may have raced with a removal).
    pub async fn touch(&self, addr: SocketAddr) {
        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get_mut(&addr) {
            client.touch();
        }
    }

    /// Removes a client and returns its username, or `None` if it was
    /// already removed. Safe to call redundantly from the session handler,
    /// the broadcaster, and the idle reaper.
    ///
    /// Firing the close signal happens after the lock is released; it wakes
    /// the session handler's pending read so the client's task terminates
    /// and the connection closes.
    pub async fn remove(&self, addr: SocketAddr) -> Option<String> {
        let client = {
            let mut clients = self.clients.lock().await;
            clients.remove(&addr)?
        };

        client.shutdown_signal().notify_one();
        Some(client.into_username())
    }

    /// Returns a consistent copy of all entries for iteration outside the
    /// lock.
    pub async fn snapshot(&self) -> Vec<ClientSnapshot> {
        let clients = self.clients.lock().await;
        clients
            .values()
            .map(|client| ClientSnapshot {
                addr: client.addr(),
                username: client.username().to_string(),
                writer: client.writer(),
                last_activity: client.last_activity(),
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        let clients = self.clients.lock().await;
        clients.len()
    }

    pub async fn contains(&self, addr: SocketAddr) -> bool {
        let clients = self.clients.lock().await;
        clients.contains_key(&addr)
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::Notify;

    // Opens a real connection pair and builds a Client from the accepted
    // side. The returned stream keeps the peer end alive.
    async fn test_client(username: &str) -> (Client, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let peer = TcpStream::connect(listener.local_addr().unwrap())
            .await
            .unwrap();
        let (accepted, addr) = listener.accept().await.unwrap();
        let (_read_half, write_half) = accepted.into_split();

        let client = Client::new(
            addr,
            username.to_string(),
            Arc::new(Mutex::new(write_half)),
            Arc::new(Notify::new()),
        );
        (client, peer)
    }

    #[tokio::test]
    async fn test_register_and_remove() {
        let registry = ClientRegistry::new();
        let (client, _peer) = test_client("ALICE").await;
        let addr = client.addr();

        registry.register(client).await;
        assert_eq!(registry.len().await, 1);
        assert!(registry.contains(addr).await);

        assert_eq!(registry.remove(addr).await, Some("ALICE".to_string()));
        assert_eq!(registry.len().await, 0);
        assert!(!registry.contains(addr).await);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let registry = ClientRegistry::new();
        let (client, _peer) = test_client("ALICE").await;
        let addr = client.addr();
        registry.register(client).await;

        assert_eq!(registry.remove(addr).await, Some("ALICE".to_string()));
        // Second removal reports "already removed" and changes nothing
        assert_eq!(registry.remove(addr).await, None);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_remove_fires_shutdown_signal() {
        let registry = ClientRegistry::new();
        let (client, _peer) = test_client("ALICE").await;
        let addr = client.addr();
        let shutdown = client.shutdown_signal();
        registry.register(client).await;

        registry.remove(addr).await;

        // The stored permit resolves a subsequent wait immediately
        tokio::time::timeout(Duration::from_secs(1), shutdown.notified())
            .await
            .expect("shutdown signal was not fired");
    }

    #[tokio::test]
    async fn test_snapshot_matches_registered_clients() {
        let registry = ClientRegistry::new();
        let (alice, _peer_a) = test_client("ALICE").await;
        let (bob, _peer_b) = test_client("BOB").await;
        let alice_addr = alice.addr();

        registry.register(alice).await;
        registry.register(bob).await;

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), registry.len().await);

        let mut usernames: Vec<_> = snapshot.iter().map(|e| e.username.clone()).collect();
        usernames.sort();
        assert_eq!(usernames, vec!["ALICE".to_string(), "BOB".to_string()]);

        registry.remove(alice_addr).await;
        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].username, "BOB");
    }

    #[tokio::test]
    async fn test_touch_refreshes_last_activity() {
        let registry = ClientRegistry::new();
        let (client, _peer) = test_client("ALICE").await;
        let addr = client.addr();
        registry.register(client).await;

        let before = registry.snapshot().await[0].last_activity;
        tokio::time::sleep(Duration::from_millis(20)).await;
        registry.touch(addr).await;
        let after = registry.snapshot().await[0].last_activity;

        assert!(after > before);
    }

    #[tokio::test]
    async fn test_touch_absent_is_noop() {
        let registry = ClientRegistry::new();
        let (client, _peer) = test_client("ALICE").await;
        let addr = client.addr();

        // Never registered; touch must not create an entry
        drop(client);
        registry.touch(addr).await;
        assert_eq!(registry.len().await, 0);
    }
}
