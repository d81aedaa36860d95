use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::tcp::OwnedReadHalf;
use tokio::sync::Notify;

use crate::client::registry::ClientRegistry;
use crate::client::session::{ReadEvent, SessionState};
use crate::protocol::{MESSAGE_BUFFER_SIZE, chat_frame, left_notice};
use crate::relay::broadcast;

/// Runs the read loop for one registered client.
///
/// - Every received message refreshes the client's activity timestamp and
///   is relayed to all other clients as a BLUE chat frame.
/// - A clean close, a read error, and a fired close signal all end the
///   session the same way.
/// - On exit the handler removes itself from the registry; the left-chat
///   notice is broadcast only if this call actually performed the removal,
///   so a client evicted by the reaper or dropped by a failed broadcast is
///   never announced twice.
pub async fn handle_client(
    mut read_half: OwnedReadHalf,
    client_addr: SocketAddr,
    registry: Arc<ClientRegistry>,
    shutdown: Arc<Notify>,
) {
    let mut buffer = [0u8; MESSAGE_BUFFER_SIZE];
    let mut state = SessionState::Active;

    while state.is_active() {
        let event = tokio::select! {
            result = read_half.read(&mut buffer) => match result {
                Ok(0) => ReadEvent::Closed,
                Ok(n) => ReadEvent::Message(buffer[..n].to_vec()),
                Err(e) => ReadEvent::Failed(e.kind()),
            },
            _ = shutdown.notified() => ReadEvent::Evicted,
        };

        match &event {
            ReadEvent::Message(bytes) => {
                registry.touch(client_addr).await;

                let text = String::from_utf8_lossy(bytes);
                broadcast(
                    &registry,
                    chat_frame(&text).as_bytes(),
                    Some(client_addr),
                )
                .await;
            }
            ReadEvent::Closed => {
                info!("Connection closed by client {}", client_addr);
            }
            ReadEvent::Failed(kind) => {
                warn!("Failed to read from {}: {}", client_addr, kind);
            }
            ReadEvent::Evicted => {
                info!("Session for {} force-closed", client_addr);
            }
        }

        state = state.apply(&event);
    }

    if let Some(username) = registry.remove(client_addr).await {
        info!("Client {} ('{}') disconnected", client_addr, username);
        broadcast(&registry, left_notice(&username).as_bytes(), None).await;
    }
}
