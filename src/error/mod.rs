//! Error handling
//!
//! Defines error types and handling for the chat relay server.

pub mod types;

pub use types::*;
