//! Module `messages`
//!
//! The literal payloads exchanged with clients. Control messages are bare
//! strings; everything else is a color-tagged frame of the form
//! `<COLOR>!<text>`, where the separator is the first `!`.

use std::fmt;

/// Asks a fresh connection to respond with its username.
pub const USERNAME_REQUEST: &str = "USERNAME_REQUEST";

/// Confirms to a client that the handshake completed.
pub const CLIENT_CONNECTED: &str = "CLIENT_CONNECTED";

/// Tells a client it is being force-disconnected for inactivity.
pub const IDLE_TIMEOUT: &str = "IDLE_TIMEOUT";

/// Read buffer size; one read of up to this many bytes is treated as one
/// application message.
pub const MESSAGE_BUFFER_SIZE: usize = 1024;

/// Display color a frame is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Blue,
    Red,
    Yellow,
    White,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Green => "GREEN",
            Color::Blue => "BLUE",
            Color::Red => "RED",
            Color::Yellow => "YELLOW",
            Color::White => "WHITE",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builds a color-tagged frame.
pub fn frame(color: Color, content: &str) -> String {
    format!("{}!{}", color, content)
}

/// Relayed chat content, shown in blue.
pub fn chat_frame(content: &str) -> String {
    frame(Color::Blue, content)
}

/// Arrival announcement, shown in green.
pub fn entered_notice(username: &str) -> String {
    frame(
        Color::Green,
        &format!("\n'{}' just entered the chat!\n", username),
    )
}

/// Departure announcement, shown in red.
pub fn left_notice(username: &str) -> String {
    frame(
        Color::Red,
        &format!("\n'{}' just left the chat!\n", username),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_format() {
        assert_eq!(frame(Color::White, "hi"), "WHITE!hi");
        assert_eq!(frame(Color::Yellow, ""), "YELLOW!");
    }

    #[test]
    fn test_chat_frame() {
        assert_eq!(chat_frame("ALICE: hello"), "BLUE!ALICE: hello");
    }

    #[test]
    fn test_entered_notice() {
        assert_eq!(
            entered_notice("BOB"),
            "GREEN!\n'BOB' just entered the chat!\n"
        );
    }

    #[test]
    fn test_left_notice() {
        assert_eq!(left_notice("ALICE"), "RED!\n'ALICE' just left the chat!\n");
    }
}
