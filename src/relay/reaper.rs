//! Idle client eviction.

use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::sleep;

use crate::client::registry::ClientRegistry;
use crate::client::state::send_bytes;
use crate::protocol::IDLE_TIMEOUT;
use crate::server::config::ServerConfig;

/// Periodically sweeps the registry and evicts clients idle beyond the
/// configured threshold. Never terminates.
///
/// Each evicted client is sent the `IDLE_TIMEOUT` control message before
/// removal; a failed send is logged and does not stop the sweep. Idle
/// eviction deliberately broadcasts no left-chat notice — that announcement
/// belongs to the client-initiated disconnect path.
pub async fn run_idle_reaper(registry: Arc<ClientRegistry>, config: Arc<ServerConfig>) {
    let interval = config.sweep_interval();
    let threshold = config.idle_timeout();

    loop {
        sleep(interval).await;

        let now = Instant::now();
        for entry in registry.snapshot().await {
            let idle = now.duration_since(entry.last_activity);
            if idle <= threshold {
                continue;
            }

            info!(
                "Evicting '{}' ({}) after {}s idle",
                entry.username,
                entry.addr,
                idle.as_secs()
            );

            if let Err(e) = send_bytes(&entry.writer, IDLE_TIMEOUT.as_bytes()).await {
                warn!("Failed to notify {} of idle timeout: {}", entry.addr, e);
            }

            registry.remove(entry.addr).await;
        }
    }
}
