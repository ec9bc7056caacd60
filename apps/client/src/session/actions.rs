//! Player actions outside the shop and voucher subsystems: blind proposal,
//! hand selection, play, discard and the continue gates.

use super::phase::block_for_continue;
use super::state::{Phase, SessionState, MAX_PICKED};
use crate::domain::{CardItem, ItemId};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::protocol::Outbound;

fn ensure_phase(state: &SessionState, phase: Phase) -> Result<(), DomainError> {
    if state.phase != phase {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("expected {phase:?}, in {:?}", state.phase),
        ));
    }
    if state.action_blocked {
        return Err(DomainError::validation(
            ValidationKind::ActionBlocked,
            "actions are blocked",
        ));
    }
    Ok(())
}

fn ensure_dealt(state: &SessionState) -> Result<(), DomainError> {
    if state.hand.is_provisional() {
        return Err(DomainError::validation(
            ValidationKind::InvalidSelection,
            "hand has not been dealt yet",
        ));
    }
    Ok(())
}

pub fn propose_blind(state: &SessionState, blind: i64, lobby: &str) -> Result<Outbound, DomainError> {
    ensure_phase(state, Phase::Blind)?;
    if blind <= 0 {
        return Err(DomainError::validation(
            ValidationKind::Other("blind".into()),
            format!("blind must be positive, got {blind}"),
        ));
    }
    Ok(Outbound::ProposeBlind {
        blind,
        lobby: lobby.to_owned(),
    })
}

/// Flip selection of a hand card; at most five can be picked.
pub fn toggle_pick(state: &mut SessionState, item: ItemId) -> Result<(), DomainError> {
    ensure_phase(state, Phase::Play)?;
    ensure_dealt(state)?;
    let picked = state.hand.picked_count();
    let card = state
        .hand
        .authoritative_mut()
        .iter_mut()
        .find(|c| c.id == item)
        .ok_or_else(|| {
            DomainError::validation(ValidationKind::UnknownItem, format!("{item} is not in hand"))
        })?;
    if !card.picked && picked >= MAX_PICKED {
        return Err(DomainError::validation(
            ValidationKind::InvalidSelection,
            format!("at most {MAX_PICKED} cards can be picked"),
        ));
    }
    card.picked = !card.picked;
    Ok(())
}

fn ensure_selection(state: &SessionState) -> Result<usize, DomainError> {
    let picked = state.hand.picked_count();
    if picked == 0 || picked > MAX_PICKED {
        return Err(DomainError::validation(
            ValidationKind::InvalidSelection,
            format!("{picked} cards picked"),
        ));
    }
    Ok(picked)
}

/// Move the picked cards to the table and build `play_hand`.
pub fn play_hand(state: &mut SessionState) -> Result<Outbound, DomainError> {
    ensure_phase(state, Phase::Play)?;
    ensure_dealt(state)?;
    if state.hands <= 0 {
        return Err(DomainError::validation(
            ValidationKind::NoHandsLeft,
            "no hands left this round",
        ));
    }
    if state.anim.running {
        return Err(DomainError::validation(
            ValidationKind::ActionBlocked,
            "previous hand is still being scored",
        ));
    }
    ensure_selection(state)?;

    let (played, kept): (Vec<CardItem>, Vec<CardItem>) = std::mem::take(state.hand.authoritative_mut())
        .into_iter()
        .partition(|c| c.picked);
    *state.hand.authoritative_mut() = kept;
    state.played_cards = played
        .into_iter()
        .map(|c| CardItem { picked: false, ..c })
        .collect();

    Ok(Outbound::PlayHand {
        cards: state.played_cards.iter().map(|c| c.card).collect(),
        jokers: state.joker_slots(),
        gold: state.money,
    })
}

/// Build `discard_cards`; the hand changes when the server confirms.
pub fn discard(state: &SessionState) -> Result<Outbound, DomainError> {
    ensure_phase(state, Phase::Play)?;
    ensure_dealt(state)?;
    if state.discards <= 0 {
        return Err(DomainError::validation(
            ValidationKind::NoDiscardsLeft,
            "no discards left this round",
        ));
    }
    ensure_selection(state)?;
    Ok(Outbound::DiscardCards {
        cards: state.picked_hand_cards(),
    })
}

/// Leave the Shop. Blocks further actions until the next phase starts.
pub fn continue_to_vouchers(state: &mut SessionState) -> Result<Outbound, DomainError> {
    ensure_phase(state, Phase::Shop)?;
    block_for_continue(state);
    Ok(Outbound::ContinueToVouchers)
}

/// Leave the Vouchers phase.
pub fn continue_to_next_blind(state: &mut SessionState) -> Result<Outbound, DomainError> {
    ensure_phase(state, Phase::Vouchers)?;
    block_for_continue(state);
    Ok(Outbound::ContinueToNextBlind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::items::wrap_all;
    use crate::domain::{Card, OwnedJoker, Rank, Suit};
    use crate::session::state::Hand;

    fn play_state() -> SessionState {
        let mut state = SessionState::new();
        state.phase = Phase::Play;
        state.hands = 4;
        state.discards = 2;
        state.money = 7;
        let cards: Vec<Card> = Rank::ALL[..8]
            .iter()
            .map(|&r| Card::new(r, Suit::Hearts))
            .collect();
        state.hand = Hand::Authoritative(wrap_all(cards, &mut state.ids));
        state.jokers = wrap_all(
            vec![OwnedJoker {
                joker_id: 9,
                sell_price: None,
            }],
            &mut state.ids,
        );
        state
    }

    fn pick(state: &mut SessionState, n: usize) {
        let ids: Vec<ItemId> = state.hand.cards().iter().take(n).map(|c| c.id).collect();
        for id in ids {
            toggle_pick(state, id).unwrap();
        }
    }

    #[test]
    fn sixth_pick_is_refused() {
        let mut state = play_state();
        pick(&mut state, 5);
        let sixth = state.hand.cards()[5].id;
        assert!(toggle_pick(&mut state, sixth).is_err());
        assert_eq!(state.hand.picked_count(), 5);
    }

    #[test]
    fn play_moves_picked_cards_to_the_table() {
        let mut state = play_state();
        pick(&mut state, 2);
        let msg = play_hand(&mut state).unwrap();

        assert_eq!(state.hand.cards().len(), 6);
        assert_eq!(state.played_cards.len(), 2);
        assert!(state.played_cards.iter().all(|c| !c.picked));
        let hand_ids: Vec<ItemId> = state.hand.cards().iter().map(|c| c.id).collect();
        assert!(state.played_cards.iter().all(|c| !hand_ids.contains(&c.id)));

        let Outbound::PlayHand { cards, jokers, gold } = msg else {
            panic!("wrong intent");
        };
        assert_eq!(cards.len(), 2);
        assert_eq!(jokers, [9, 0, 0, 0, 0]);
        assert_eq!(gold, 7);
    }

    #[test]
    fn play_requires_hands_and_a_selection() {
        let mut state = play_state();
        assert!(play_hand(&mut state).is_err());
        pick(&mut state, 1);
        state.hands = 0;
        let err = play_hand(&mut state).unwrap_err();
        assert_eq!(err.validation_kind(), Some(&ValidationKind::NoHandsLeft));
    }

    #[test]
    fn discard_requires_discards() {
        let mut state = play_state();
        pick(&mut state, 3);
        assert!(matches!(discard(&state), Ok(Outbound::DiscardCards { ref cards }) if cards.len() == 3));
        state.discards = 0;
        assert!(discard(&state).is_err());
    }

    #[test]
    fn continue_blocks_until_next_phase() {
        let mut state = SessionState::new();
        state.phase = Phase::Shop;
        assert_eq!(continue_to_vouchers(&mut state).unwrap(), Outbound::ContinueToVouchers);
        assert!(state.action_blocked);
        assert!(continue_to_vouchers(&mut state).is_err());
    }
}
