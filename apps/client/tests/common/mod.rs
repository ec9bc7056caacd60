#![allow(dead_code)]

// tests/common/mod.rs
pub mod proptest_prelude;

use client::config::Config;
use client::domain::Catalog;
use client::protocol::Outbound;
use client::runtime::GameSession;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use time::macros::datetime;
use time::OffsetDateTime;

// Logging is auto-installed for every test binary that pulls in `common`
#[ctor::ctor]
fn init_logging() {
    client_test_support::test_logging::init();
}

pub const USERNAME: &str = "ana";
pub const LOBBY: &str = "ABCD";

/// Fixed wall clock for reconciliation; countdowns are computed against it.
pub const NOW: OffsetDateTime = datetime!(2025-04-19 13:12:43 UTC);

/// Config with instant animations and no provisional draw.
pub fn config() -> Config {
    let mut config = Config::new("ws://localhost:3000", USERNAME, "token", LOBBY);
    config.animation_speed_ms = 0;
    config
}

pub fn session_with(config: Config) -> GameSession {
    GameSession::with_rng(config, Catalog::standard(), StdRng::seed_from_u64(7))
}

pub fn session() -> GameSession {
    session_with(config())
}

/// Deliver one server event at `NOW`.
pub fn deliver(session: &mut GameSession, name: &str, payload: Value) -> Vec<Outbound> {
    session.handle_inbound(name, vec![payload], NOW)
}

/// Event names of a batch of outbound messages, in order.
pub fn names(out: &[Outbound]) -> Vec<&'static str> {
    out.iter().map(Outbound::name).collect()
}
