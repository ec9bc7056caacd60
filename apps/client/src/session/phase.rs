//! Phase State Machine: direct jumps between any two phases, with the
//! mandatory entry resets.

use rand::Rng;
use tracing::debug;

use super::effects::{Effect, TimerKind, VOUCHER_AUTO_ADVANCE_MS};
use super::state::{Hand, Phase, SessionState, HAND_SIZE};
use crate::domain::items::Wrapped;
use crate::domain::CardItem;

/// Enter `phase`, running its entry resets even when already in it.
///
/// Used by explicit phase-start events. Every entry bumps the phase epoch
/// and the animation generation, so timers from the previous phase become
/// no-ops.
pub fn enter_phase(state: &mut SessionState, phase: Phase) {
    debug!(from = ?state.phase, to = ?phase, "[PHASE] enter");
    state.phase = phase;
    state.phase_epoch += 1;
    state.anim.reset();

    if state.continue_requested_from == Some(phase) {
        state.action_blocked = true;
    } else {
        state.action_blocked = false;
        state.continue_requested_from = None;
    }

    if phase != Phase::Shop {
        state.shop = Default::default();
        state.pending_pack = None;
    }

    match phase {
        Phase::Play => {
            state.hand = Hand::default();
            state.played_cards.clear();
        }
        Phase::Shop => state.active_vouchers.clear(),
        Phase::None | Phase::Blind | Phase::Vouchers | Phase::AnnounceWinner => {}
    }
}

/// Move to `phase` as reported by a snapshot. Staying in the same phase
/// keeps local state and only re-asserts a pending continue block.
pub fn sync_phase(state: &mut SessionState, phase: Phase) -> bool {
    if state.phase == phase {
        if state.continue_requested_from == Some(phase) {
            state.action_blocked = true;
        }
        return false;
    }
    enter_phase(state, phase);
    true
}

/// Record that the player asked to leave the current phase.
pub fn block_for_continue(state: &mut SessionState) {
    state.continue_requested_from = Some(state.phase);
    state.action_blocked = true;
}

/// Schedule the Vouchers shortcut once the owned vouchers are known.
pub fn after_vouchers_populated(state: &SessionState) -> Vec<Effect> {
    if state.phase == Phase::Vouchers && state.vouchers.is_empty() {
        debug!(epoch = state.phase_epoch, "[PHASE] no vouchers owned, auto-advancing");
        vec![Effect::schedule(
            VOUCHER_AUTO_ADVANCE_MS,
            TimerKind::AutoAdvanceVouchers {
                phase_epoch: state.phase_epoch,
            },
        )]
    } else {
        Vec::new()
    }
}

/// Schedule the provisional 8-card filler, one card per animation unit
/// after a two unit lead-in. Nothing is scheduled once real cards exist.
pub fn schedule_provisional_draw(state: &SessionState, unit_ms: u64) -> Vec<Effect> {
    if state.phase != Phase::Play || !state.hand.authoritative().is_empty() {
        return Vec::new();
    }
    (0..HAND_SIZE as u64)
        .map(|i| {
            Effect::schedule(
                unit_ms * (i + 2),
                TimerKind::ProvisionalDraw {
                    phase_epoch: state.phase_epoch,
                },
            )
        })
        .collect()
}

/// Draw one random card from the remaining deck into a provisional hand.
/// Returns whether anything changed.
pub fn provisional_draw_step<R: Rng>(state: &mut SessionState, phase_epoch: u64, rng: &mut R) -> bool {
    if phase_epoch != state.phase_epoch || state.deck_left.is_empty() {
        return false;
    }
    let mut cards = match std::mem::take(&mut state.hand) {
        Hand::Provisional(cards) => cards,
        Hand::Authoritative(cards) if cards.is_empty() => cards,
        authoritative => {
            state.hand = authoritative;
            return false;
        }
    };
    if cards.len() >= HAND_SIZE {
        state.hand = Hand::Provisional(cards);
        return false;
    }
    let idx = rng.random_range(0..state.deck_left.len());
    let card = state.deck_left.swap_remove(idx);
    cards.push(CardItem::wrap(state.ids.next_id(), card));
    state.hand = Hand::Provisional(cards);
    true
}
