//! Wire protocol for the chat relay
//!
//! Control message literals, color-tagged frames, and the notice builders
//! used for arrival, departure, and relayed chat messages.

pub mod messages;
pub mod parser;

pub use messages::{
    CLIENT_CONNECTED, Color, IDLE_TIMEOUT, MESSAGE_BUFFER_SIZE, USERNAME_REQUEST, chat_frame,
    entered_notice, frame, left_notice,
};
pub use parser::split_frame;
