//! Best-effort fan-out delivery.

use log::{debug, info, warn};
use std::net::SocketAddr;

use crate::client::registry::ClientRegistry;
use crate::client::state::send_bytes;

/// Sends `message` to every registered client except `exclude`.
///
/// Delivery runs against a registry snapshot, so the registry lock is never
/// held across a network send. A failed send means the peer is gone: the
/// recipient is removed from the registry after the delivery loop finishes.
/// Removal here announces nothing further, which keeps one broadcast from
/// recursively triggering another.
pub async fn broadcast(registry: &ClientRegistry, message: &[u8], exclude: Option<SocketAddr>) {
    let snapshot = registry.snapshot().await;
    debug!(
        "Broadcasting {} bytes to {} client(s)",
        message.len(),
        snapshot.len()
    );

    let mut stale = Vec::new();
    for entry in &snapshot {
        if Some(entry.addr) == exclude {
            continue;
        }

        if let Err(e) = send_bytes(&entry.writer, message).await {
            warn!("Failed to send to {} ('{}'): {}", entry.addr, entry.username, e);
            stale.push(entry.addr);
        }
    }

    for addr in stale {
        if registry.remove(addr).await.is_some() {
            info!("Dropped unreachable client {}", addr);
        }
    }
}
