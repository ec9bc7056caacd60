//! Client test support utilities
//!
//! Unified logging initialization for integration tests plus builders for
//! the JSON payloads the game server sends.

pub mod payloads;
pub mod test_logging;
