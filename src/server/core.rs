use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, Notify};

use crate::client::handle_client;
use crate::client::registry::ClientRegistry;
use crate::client::state::{Client, send_bytes};
use crate::error::HandshakeError;
use crate::protocol::{CLIENT_CONNECTED, MESSAGE_BUFFER_SIZE, USERNAME_REQUEST, entered_notice};
use crate::relay::{broadcast, run_idle_reaper};
use crate::server::config::ServerConfig;

pub struct Server {
    registry: Arc<ClientRegistry>,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    pub async fn new(config: ServerConfig) -> Self {
        let socket_addr = config.socket_addr();

        let listener = match TcpListener::bind(&socket_addr).await {
            Ok(listener) => {
                info!("Server bound to {}", socket_addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket_addr, e);
                panic!("Server startup failed on socket {}: {}", socket_addr, e);
            }
        };

        Self {
            registry: Arc::new(ClientRegistry::new()),
            listener,
            config: Arc::new(config),
        }
    }

    /// The address the listener is actually bound to (relevant when the
    /// configured port is 0 and the OS picked one).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Starting chat relay server on {} (idle timeout {}s, sweep every {}s)",
            self.config.socket_addr(),
            self.config.idle_timeout_secs,
            self.config.sweep_interval_secs,
        );

        {
            let registry = Arc::clone(&self.registry);
            let config = Arc::clone(&self.config);
            tokio::spawn(async move {
                run_idle_reaper(registry, config).await;
            });
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!("Connected with {}", addr);
                    let registry = Arc::clone(&self.registry);

                    // Spawn a task for each client so the accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) = handle_new_client(stream, addr, registry).await {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Handles a new connection: runs the username handshake, registers the
/// client, announces the arrival, and hands off to the session handler.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    registry: Arc<ClientRegistry>,
) -> Result<(), HandshakeError> {
    let username = request_username(&mut stream).await?;
    info!("Client {} joined as '{}'", client_addr, username);

    let (read_half, write_half) = stream.into_split();
    let writer = Arc::new(Mutex::new(write_half));
    let shutdown = Arc::new(Notify::new());

    registry
        .register(Client::new(
            client_addr,
            username.clone(),
            Arc::clone(&writer),
            Arc::clone(&shutdown),
        ))
        .await;

    // Inform the client that it has successfully connected
    if let Err(e) = send_bytes(&writer, CLIENT_CONNECTED.as_bytes()).await {
        registry.remove(client_addr).await;
        return Err(e.into());
    }

    // Announce the arrival to everyone else
    broadcast(
        &registry,
        entered_notice(&username).as_bytes(),
        Some(client_addr),
    )
    .await;

    handle_client(read_half, client_addr, registry, shutdown).await;

    Ok(())
}

/// Runs the username handshake on a fresh connection.
///
/// The response is taken as-is; usernames are not validated and duplicates
/// are allowed.
async fn request_username(stream: &mut TcpStream) -> Result<String, HandshakeError> {
    stream.write_all(USERNAME_REQUEST.as_bytes()).await?;
    stream.flush().await?;

    let mut buffer = [0u8; MESSAGE_BUFFER_SIZE];
    let n = stream.read(&mut buffer).await?;
    if n == 0 {
        return Err(HandshakeError::Disconnected);
    }

    Ok(String::from_utf8_lossy(&buffer[..n]).into_owned())
}
