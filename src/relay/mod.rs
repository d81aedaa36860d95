//! Message relay subsystem
//!
//! Fan-out delivery to all connected clients and the background sweep that
//! evicts idle ones.

pub mod broadcast;
pub mod reaper;

pub use broadcast::broadcast;
pub use reaper::run_idle_reaper;
