#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod animation;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod protocol;
pub mod reconcile;
pub mod runtime;
pub mod session;
pub mod shop;
pub mod vouchers;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use config::{Config, LogFormat, PhaseDurations};
pub use domain::Catalog;
pub use error::ClientError;
pub use errors::domain::DomainError;
pub use protocol::{InboundEvent, Outbound};
pub use runtime::{GameSession, UserIntent};
pub use session::{Phase, SessionState, SessionStore};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
