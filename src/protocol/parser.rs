//! Frame splitting
//!
//! Splits a color-tagged frame into its color tag and content. This is how
//! receivers are expected to interpret server notices; the chat content
//! itself may contain further `!` characters, so only the first one counts.

/// Splits `raw` on the first `!` into `(color, content)`. Returns `None`
/// for payloads without a separator (the bare control messages).
pub fn split_frame(raw: &str) -> Option<(&str, &str)> {
    raw.split_once('!')
}
