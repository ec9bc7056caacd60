//! Blind, round and hand deltas.

use tracing::{debug, warn};

use super::{roster, ReconcileCtx};
use crate::animation::{sequencer, ScoreReveal};
use crate::domain::items::{rewrap, wrap_all};
use crate::domain::{Card, CardItem};
use crate::protocol::inbound::{
    BlindUpdated, DiscardedCards, FullDeck, GotCards, PlayedHand, StartingNextBlind, StartingRound,
    StartingVouchers,
};
use crate::protocol::Outbound;
use crate::session::effects::Effect;
use crate::session::phase::{after_vouchers_populated, enter_phase, schedule_provisional_draw};
use crate::session::state::{Hand, Phase, SessionState};

/// `starting_next_blind`: the proposed blind seeds the score to beat.
pub fn starting_next_blind(state: &mut SessionState, ctx: &ReconcileCtx<'_>, p: &StartingNextBlind) {
    state.min_score = p.base_blind;
    state.proposed_blind = p.base_blind;
    enter_phase(state, Phase::Blind);
    ctx.refresh_time_left(
        state,
        Phase::Blind,
        p.timeout.as_ref(),
        p.timeout_start_date.as_deref(),
    );
}

/// Only our own proposals move the displayed blind.
pub fn blind_updated(state: &mut SessionState, ctx: &ReconcileCtx<'_>, p: &BlindUpdated) {
    if p.proposed_by == ctx.username {
        state.min_score = p.new_blind;
    } else {
        debug!(by = %p.proposed_by, blind = p.new_blind, "[RECONCILE] blind proposed by another player");
    }
}

/// `starting_round`: enter Play and ask for the authoritative hand.
pub fn starting_round(
    state: &mut SessionState,
    ctx: &ReconcileCtx<'_>,
    p: &StartingRound,
) -> Vec<Effect> {
    state.min_score = p.blind;
    state.round = p.round_number;
    state.deck_size = p.current_deck_size;
    state.pot = p.current_pot;
    state.hands = p.total_hand_plays;
    state.discards = p.total_discards;
    enter_phase(state, Phase::Play);
    ctx.refresh_time_left(
        state,
        Phase::Play,
        p.timeout.as_ref(),
        p.timeout_start_date.as_deref(),
    );

    let mut effects = vec![Effect::Emit(Outbound::GetCards)];
    if ctx.provisional_draw {
        effects.extend(schedule_provisional_draw(state, ctx.animation_unit_ms));
    }
    effects
}

/// `got_cards`: the hand becomes exactly the server's list.
pub fn got_cards(state: &mut SessionState, p: &GotCards) {
    let hand = rewrap(state.hand.authoritative(), p.current_hand.clone(), &mut state.ids);
    state.hand = Hand::Authoritative(hand);
}

fn append_to_hand(state: &mut SessionState, cards: &[Card]) {
    let mut drawn: Vec<CardItem> = wrap_all(cards.to_vec(), &mut state.ids);
    state.hand.authoritative_mut().append(&mut drawn);
}

/// `played_hand`: refill the hand, take the new counters, start the reveal.
pub fn played_hand(state: &mut SessionState, ctx: &ReconcileCtx<'_>, p: &PlayedHand) -> Vec<Effect> {
    append_to_hand(state, &p.new_cards);
    state.hands = p.left_plays;
    state.money = p.gold;
    state.deck_left_count = p.unplayed_cards;

    let reveal = ScoreReveal {
        hand_type: p.hand_type - 1,
        blue: p.blue_score,
        red: p.red_score,
        total: p.total_score,
        jokers_triggered: p.jokers_triggered.clone(),
        scored_cards: p.scored_cards.clone(),
    };
    match sequencer::start(state, ctx.catalog, reveal, ctx.animation_unit_ms) {
        Ok(effects) => effects,
        Err(err) => {
            warn!(error = %err, "[RECONCILE] played hand without a reveal");
            Vec::new()
        }
    }
}

/// `discarded_cards`: drop the picked cards and add the replacements.
pub fn discarded_cards(state: &mut SessionState, p: &DiscardedCards) {
    state.hand.authoritative_mut().retain(|c| !c.picked);
    append_to_hand(state, &p.new_cards);
    state.discards = p.left_discards;
    state.deck_left_count = p.unplayed_cards;
}

pub fn full_deck(state: &mut SessionState, p: &FullDeck) {
    state.deck_left = p.unplayed_cards.clone();
    state.deck_played = p.played_cards.clone();
    state.deck_left_count = i64::try_from(state.deck_left.len()).unwrap_or(i64::MAX);
}

/// `starting_vouchers`: enter Vouchers, recompute the owned set, then apply
/// the empty-set shortcut.
pub fn starting_vouchers(
    state: &mut SessionState,
    ctx: &ReconcileCtx<'_>,
    p: &StartingVouchers,
) -> Vec<Effect> {
    if let Some(round) = p.current_round {
        state.round = round;
    }
    enter_phase(state, Phase::Vouchers);
    ctx.refresh_time_left(
        state,
        Phase::Vouchers,
        p.timeout.as_ref(),
        p.timeout_start_date.as_deref(),
    );
    if let Some(list) = &p.vouchers {
        state.vouchers = rewrap(&state.vouchers, list.vouchers(None), &mut state.ids);
    }
    if let Some(users) = &p.users_in_lobby {
        roster::replace_from_game(state, users);
    }
    after_vouchers_populated(state)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;
    use crate::config::PhaseDurations;
    use crate::domain::{Catalog, Rank, Suit};
    use crate::session::effects::emitted;

    fn ctx(catalog: &Catalog) -> ReconcileCtx<'_> {
        ReconcileCtx {
            catalog,
            username: "ana",
            lobby_code: "ABCD",
            now: datetime!(2025-01-01 00:00:10 UTC),
            phase_durations: PhaseDurations::default(),
            animation_unit_ms: 100,
            provisional_draw: false,
        }
    }

    fn played(hand_type: i64) -> PlayedHand {
        serde_json::from_value(json!({
            "new_cards": [{"Rank": "A", "Suit": "s"}],
            "left_plays": 2,
            "gold": 14,
            "unplayed_cards": 30,
            "hand_type": hand_type,
            "blue_score": 20,
            "red_score": 2,
            "total_score": 40
        }))
        .expect("payload")
    }

    #[test]
    fn played_hand_type_is_one_based() {
        let catalog = Catalog::standard();
        let mut state = SessionState::new();
        enter_phase(&mut state, Phase::Play);

        let effects = played_hand(&mut state, &ctx(&catalog), &played(2));
        assert_eq!(state.anim.hand_type, Some(1));
        assert_eq!((state.anim.blue, state.anim.red), (10, 2));
        assert!(!effects.is_empty());

        assert_eq!(state.hands, 2);
        assert_eq!(state.money, 14);
        assert_eq!(state.deck_left_count, 30);
        assert_eq!(state.hand.cards()[0].card.rank, Rank::Ace);
        assert_eq!(state.hand.cards()[0].card.suit, Suit::Spades);
    }

    #[test]
    fn out_of_table_hand_type_still_applies_counters() {
        let catalog = Catalog::standard();
        let mut state = SessionState::new();
        enter_phase(&mut state, Phase::Play);

        let effects = played_hand(&mut state, &ctx(&catalog), &played(0));
        assert!(effects.is_empty());
        assert!(!state.anim.running);
        assert_eq!(state.money, 14);
    }

    #[test]
    fn starting_round_requests_cards_and_resets_counters() {
        let catalog = Catalog::standard();
        let mut state = SessionState::new();
        let round: StartingRound = serde_json::from_value(json!({
            "blind": 450,
            "round_number": 3,
            "timeout": 120,
            "timeout_start_date": "2025-01-01T00:00:00Z",
            "current_deck_size": 52,
            "total_hand_plays": 4,
            "total_discards": 3
        }))
        .expect("payload");

        let effects = starting_round(&mut state, &ctx(&catalog), &round);
        assert_eq!(emitted(&effects), vec![&Outbound::GetCards]);
        assert_eq!(state.phase, Phase::Play);
        assert_eq!(state.min_score, 450);
        assert_eq!(state.round, 3);
        assert_eq!(state.time_left, 110);
    }

    #[test]
    fn full_deck_replaces_both_piles() {
        let mut state = SessionState::new();
        let deck: FullDeck = serde_json::from_value(json!({
            "unplayed_cards": [{"Rank": "2", "Suit": "h"}, {"Rank": "3", "Suit": "d"}],
            "played_cards": [{"Rank": "K", "Suit": "t"}]
        }))
        .expect("payload");
        full_deck(&mut state, &deck);
        assert_eq!(state.deck_left.len(), 2);
        assert_eq!(state.deck_played.len(), 1);
        assert_eq!(state.deck_left_count, 2);
    }
}
