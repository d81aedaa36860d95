//! Chat Relay Server - Entry Point
//!
//! A Rust-based TCP chat relay: clients handshake with a username and every
//! message is fanned out to all other connected participants.

use log::info;

use chat_relay_server::server::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching chat relay server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => panic!("Failed to load server configuration: {}", e),
    };

    let server = Server::new(config).await;
    server.start().await;
}
