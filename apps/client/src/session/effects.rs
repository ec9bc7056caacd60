//! Side effects requested by state transitions.
//!
//! Handlers never touch the network or the clock. They return effects and
//! the runtime performs them: emits go to the socket, timers go to the
//! timeline and come back through `GameSession::handle_timer`.

use crate::animation::ScoreStep;
use crate::protocol::Outbound;

/// Delay before re-requesting a snapshot the server could not phase yet.
pub const SNAPSHOT_RETRY_MS: u64 = 500;
/// Delay before skipping a Vouchers phase with nothing to play.
pub const VOUCHER_AUTO_ADVANCE_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerKind {
    /// Ask for the full snapshot again. Never stale.
    RetrySnapshot,
    /// Continue past an empty Vouchers phase, if still in the same entry.
    AutoAdvanceVouchers { phase_epoch: u64 },
    /// One step of a score reveal run.
    Animation { generation: u64, step: ScoreStep },
    /// Provisional filler: move one card from the remaining deck to the hand.
    ProvisionalDraw { phase_epoch: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    pub delay_ms: u64,
    pub kind: TimerKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Emit(Outbound),
    Schedule(Timer),
}

impl Effect {
    pub fn schedule(delay_ms: u64, kind: TimerKind) -> Self {
        Effect::Schedule(Timer { delay_ms, kind })
    }

    pub fn as_emit(&self) -> Option<&Outbound> {
        match self {
            Effect::Emit(msg) => Some(msg),
            Effect::Schedule(_) => None,
        }
    }
}

/// Emitted messages in order, ignoring timers.
pub fn emitted(effects: &[Effect]) -> Vec<&Outbound> {
    effects.iter().filter_map(Effect::as_emit).collect()
}
