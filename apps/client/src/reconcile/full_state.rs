//! Full snapshot reconciliation (`game_phase_player_info`).
//!
//! Server-authoritative fields are overwritten wholesale. Collections are
//! rebuilt from the snapshot with wrapper ids reused for unchanged values,
//! so applying the same snapshot twice leaves the state as it was.

use tracing::debug;

use super::{roster, ReconcileCtx};
use crate::domain::items::rewrap;
use crate::protocol::inbound::{GamePhasePlayerInfo, OwnedList};
use crate::protocol::Outbound;
use crate::session::effects::{Effect, TimerKind, SNAPSHOT_RETRY_MS};
use crate::session::phase::{after_vouchers_populated, schedule_provisional_draw, sync_phase};
use crate::session::state::{Hand, Phase, SessionState};
use crate::shop::apply_shop_rows;

pub fn apply(
    state: &mut SessionState,
    ctx: &ReconcileCtx<'_>,
    info: &GamePhasePlayerInfo,
) -> Vec<Effect> {
    let phase = match Phase::from_wire(&info.phase) {
        Some(phase) if phase != Phase::None => phase,
        _ => {
            debug!(phase = %info.phase, "[RECONCILE] server has no phase yet, retrying");
            return vec![Effect::schedule(SNAPSHOT_RETRY_MS, TimerKind::RetrySnapshot)];
        }
    };

    let entered = sync_phase(state, phase);
    ctx.refresh_time_left(
        state,
        phase,
        info.timeout.as_ref(),
        info.timeout_start_date.as_deref(),
    );

    let data = info.player_data.clone().unwrap_or_default();
    state.round = info.current_round;
    state.max_rounds = info.max_rounds;
    state.pot = info.current_pot;
    state.min_score = info.current_base_blind - data.total_points;
    state.hands = data.hand_plays_left;
    state.discards = data.discards_left;
    state.deck_left_count = data.unplayed_cards;
    state.deck_size = data.unplayed_cards + data.played_cards;
    state.money = data.players_money;

    if !(data.current_hand.is_empty() && state.hand.is_provisional()) {
        let hand = rewrap(state.hand.authoritative(), data.current_hand, &mut state.ids);
        state.hand = Hand::Authoritative(hand);
    }

    let jokers = owned(&data.current_jokers).jokers();
    state.jokers = rewrap(&state.jokers, jokers, &mut state.ids);
    let vouchers = owned(&data.vouchers).vouchers(None);
    state.vouchers = rewrap(&state.vouchers, vouchers, &mut state.ids);
    let active = owned(&data.active_vouchers).vouchers(None);
    state.active_vouchers = rewrap(&state.active_vouchers, active, &mut state.ids);

    if let Some(users) = &info.users_in_lobby {
        roster::replace_from_game(state, users);
    }

    let mut effects = Vec::new();
    match phase {
        Phase::Play if state.hand.authoritative().is_empty() => {
            effects.push(Effect::Emit(Outbound::GetCards));
            if ctx.provisional_draw && entered {
                effects.extend(schedule_provisional_draw(state, ctx.animation_unit_ms));
            }
        }
        Phase::Shop => {
            if let Some(shop) = &info.shop {
                apply_shop_rows(state, ctx.catalog, shop);
            }
        }
        Phase::Vouchers if entered => effects.extend(after_vouchers_populated(state)),
        _ => {}
    }
    effects
}

fn owned(list: &Option<OwnedList>) -> OwnedList {
    list.clone().unwrap_or_default()
}
