//! Error types
//!
//! Domain-specific error types for the relay server. Per-connection I/O
//! failures are handled where they occur by removing the affected client;
//! only the handshake has a distinct failure surface worth naming.

use std::fmt;
use std::io;

/// Username handshake errors
#[derive(Debug)]
pub enum HandshakeError {
    /// The peer closed the connection before sending a username.
    Disconnected,
    Io(io::Error),
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeError::Disconnected => {
                write!(f, "Client disconnected during username handshake")
            }
            HandshakeError::Io(e) => write!(f, "IO error during handshake: {}", e),
        }
    }
}

impl std::error::Error for HandshakeError {}

impl From<io::Error> for HandshakeError {
    fn from(error: io::Error) -> Self {
        HandshakeError::Io(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            HandshakeError::Disconnected.to_string(),
            "Client disconnected during username handshake"
        );

        let err = HandshakeError::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe"));
        assert!(err.to_string().contains("pipe"));
    }
}
