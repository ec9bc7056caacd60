//! Reconciliation Layer: server events in, Session State mutations and
//! effects out.

pub mod clock;
pub mod full_state;
pub mod outcome;
pub mod roster;
pub mod rounds;

use time::OffsetDateTime;

use crate::config::PhaseDurations;
use crate::domain::Catalog;
use crate::protocol::inbound::Timeout;
use crate::session::state::{Phase, SessionState};

/// Read-only inputs every reconciler may need.
#[derive(Debug, Clone)]
pub struct ReconcileCtx<'a> {
    pub catalog: &'a Catalog,
    pub username: &'a str,
    pub lobby_code: &'a str,
    pub now: OffsetDateTime,
    pub phase_durations: PhaseDurations,
    pub animation_unit_ms: u64,
    pub provisional_draw: bool,
}

impl ReconcileCtx<'_> {
    /// Recompute the countdown for `phase`; leaves it alone when the phase
    /// has no timer.
    pub fn refresh_time_left(
        &self,
        state: &mut SessionState,
        phase: Phase,
        timeout: Option<&Timeout>,
        start_date: Option<&str>,
    ) {
        if let Some(left) =
            clock::phase_time_left(phase, timeout, start_date, &self.phase_durations, self.now)
        {
            state.time_left = left;
        }
    }
}
