//! Client session lifecycle
//!
//! Disconnect detection is expressed as explicit values rather than
//! errors: every read attempt produces a `ReadEvent`, and the session
//! state machine decides whether the session stays alive.

/// Outcome of one read attempt on a client connection.
#[derive(Debug)]
pub enum ReadEvent {
    /// A non-empty chunk of bytes arrived.
    Message(Vec<u8>),
    /// The peer closed its end of the connection (zero-byte read).
    Closed,
    /// The read failed. Treated exactly like a clean close: the session
    /// ends, nothing is retried, nothing propagates to the server.
    Failed(std::io::ErrorKind),
    /// The close signal fired because the client was removed from the
    /// registry (idle eviction or a failed broadcast delivery).
    Evicted,
}

/// Session state. `Disconnected` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Disconnected,
}

impl SessionState {
    /// Applies one event to the state. Only a received message keeps an
    /// active session active; every other event disconnects it.
    pub fn apply(self, event: &ReadEvent) -> SessionState {
        match (self, event) {
            (SessionState::Active, ReadEvent::Message(_)) => SessionState::Active,
            _ => SessionState::Disconnected,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_message_keeps_session_active() {
        let state = SessionState::Active;
        let next = state.apply(&ReadEvent::Message(b"hello".to_vec()));
        assert_eq!(next, SessionState::Active);
    }

    #[test]
    fn test_close_error_and_eviction_disconnect() {
        assert_eq!(
            SessionState::Active.apply(&ReadEvent::Closed),
            SessionState::Disconnected
        );
        assert_eq!(
            SessionState::Active.apply(&ReadEvent::Failed(ErrorKind::ConnectionReset)),
            SessionState::Disconnected
        );
        assert_eq!(
            SessionState::Active.apply(&ReadEvent::Evicted),
            SessionState::Disconnected
        );
    }

    #[test]
    fn test_disconnected_is_terminal() {
        let state = SessionState::Disconnected;
        assert_eq!(
            state.apply(&ReadEvent::Message(b"late".to_vec())),
            SessionState::Disconnected
        );
        assert_eq!(
            state.apply(&ReadEvent::Closed),
            SessionState::Disconnected
        );
    }
}
