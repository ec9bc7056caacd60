//! Local pre-validation of shop intents.
//!
//! The server re-validates everything. These checks only spare a round
//! trip for requests that cannot succeed; a rejection emits nothing.

use crate::domain::catalog::PackContent;
use crate::domain::ItemId;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::protocol::Outbound;
use crate::session::state::{Phase, SessionState, JOKER_CAPACITY};

fn ensure_shop_open(state: &SessionState) -> Result<(), DomainError> {
    if state.phase != Phase::Shop {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("shop is closed during {:?}", state.phase),
        ));
    }
    if state.action_blocked {
        return Err(DomainError::validation(
            ValidationKind::ActionBlocked,
            "waiting for the next phase",
        ));
    }
    Ok(())
}

fn ensure_affordable(state: &SessionState, price: i64) -> Result<(), DomainError> {
    if price > state.money {
        return Err(DomainError::validation(
            ValidationKind::InsufficientMoney,
            format!("price {price} exceeds money {}", state.money),
        ));
    }
    Ok(())
}

fn ensure_joker_room(state: &SessionState) -> Result<(), DomainError> {
    if state.jokers_full() {
        return Err(DomainError::validation(
            ValidationKind::JokerCapacity,
            format!("{} of {JOKER_CAPACITY} jokers owned", state.jokers.len()),
        ));
    }
    Ok(())
}

fn not_in_shop(item: ItemId) -> DomainError {
    DomainError::validation(ValidationKind::UnknownItem, format!("{item} is not on offer"))
}

pub fn buy_joker(state: &SessionState, item: ItemId) -> Result<Outbound, DomainError> {
    ensure_shop_open(state)?;
    let offer = state
        .shop
        .jokers
        .iter()
        .find(|e| e.id == item)
        .ok_or_else(|| not_in_shop(item))?;
    ensure_joker_room(state)?;
    ensure_affordable(state, offer.offer.price)?;
    Ok(Outbound::BuyJoker {
        id: offer.offer.shop_id,
        price: offer.offer.price,
    })
}

pub fn buy_voucher(state: &SessionState, item: ItemId) -> Result<Outbound, DomainError> {
    ensure_shop_open(state)?;
    let offer = state
        .shop
        .vouchers
        .iter()
        .find(|e| e.id == item)
        .ok_or_else(|| not_in_shop(item))?;
    ensure_affordable(state, offer.offer.price)?;
    Ok(Outbound::BuyVoucher {
        id: offer.offer.shop_id,
        price: offer.offer.price,
    })
}

/// A jokers pack cannot be opened with every joker slot taken.
pub fn buy_pack(state: &SessionState, item: ItemId) -> Result<Outbound, DomainError> {
    ensure_shop_open(state)?;
    let offer = state
        .shop
        .packs
        .iter()
        .find(|e| e.id == item)
        .ok_or_else(|| not_in_shop(item))?;
    if state.pending_pack.is_some() {
        return Err(DomainError::validation(
            ValidationKind::PackLimit,
            "finish choosing from the open pack first",
        ));
    }
    ensure_affordable(state, offer.offer.price)?;
    if offer.offer.content == PackContent::Jokers {
        ensure_joker_room(state)?;
    }
    Ok(Outbound::BuyPack {
        id: offer.offer.shop_id,
        price: offer.offer.price,
    })
}

pub fn reroll(state: &SessionState) -> Result<Outbound, DomainError> {
    ensure_shop_open(state)?;
    if state.money < state.shop.reroll_price {
        return Err(DomainError::validation(
            ValidationKind::InsufficientMoney,
            format!(
                "reroll costs {} with money {}",
                state.shop.reroll_price, state.money
            ),
        ));
    }
    if state.shop.jokers.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::NothingToReroll,
            "joker row is empty",
        ));
    }
    Ok(Outbound::RerollShop)
}

/// Sell an owned joker, addressed by its wrapper id.
pub fn sell_joker(state: &SessionState, item: ItemId) -> Result<Outbound, DomainError> {
    ensure_shop_open(state)?;
    let owned = state
        .jokers
        .iter()
        .find(|j| j.id == item)
        .ok_or_else(|| {
            DomainError::validation(ValidationKind::UnknownItem, format!("{item} is not owned"))
        })?;
    Ok(Outbound::SellJoker {
        joker_id: owned.joker.joker_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::items::wrap_all;
    use crate::domain::{OwnedJoker, ShopJoker, ShopPack};

    fn shop_state(money: i64, owned_jokers: usize) -> SessionState {
        let mut state = SessionState::new();
        state.phase = Phase::Shop;
        state.money = money;
        state.jokers = wrap_all(
            vec![
                OwnedJoker {
                    joker_id: 1,
                    sell_price: None
                };
                owned_jokers
            ],
            &mut state.ids,
        );
        state.shop.jokers = wrap_all(
            vec![ShopJoker {
                shop_id: 11,
                joker_id: 2,
                price: 1,
                sell_price: None,
            }],
            &mut state.ids,
        );
        state.shop.packs = wrap_all(
            vec![ShopPack {
                shop_id: 21,
                pack_id: 2,
                price: 4,
                content: PackContent::Jokers,
                choose_amount: 1,
            }],
            &mut state.ids,
        );
        state.shop.reroll_price = 2;
        state
    }

    fn kind(err: DomainError) -> ValidationKind {
        err.validation_kind().cloned().expect("validation error")
    }

    #[test]
    fn full_joker_slots_block_purchase_even_when_rich() {
        let state = shop_state(1000, 5);
        assert!(state.jokers_full());
        let item = state.shop.jokers[0].id;
        assert_eq!(kind(buy_joker(&state, item).unwrap_err()), ValidationKind::JokerCapacity);
    }

    #[test]
    fn affordable_joker_emits_shop_id_and_price() {
        let state = shop_state(1, 4);
        assert!(!state.jokers_full());
        let item = state.shop.jokers[0].id;
        assert_eq!(
            buy_joker(&state, item).unwrap(),
            Outbound::BuyJoker { id: 11, price: 1 }
        );
    }

    #[test]
    fn jokers_pack_blocked_at_capacity() {
        let state = shop_state(100, 5);
        let item = state.shop.packs[0].id;
        assert_eq!(kind(buy_pack(&state, item).unwrap_err()), ValidationKind::JokerCapacity);

        let state = shop_state(100, 4);
        let item = state.shop.packs[0].id;
        assert!(buy_pack(&state, item).is_ok());
    }

    #[test]
    fn reroll_needs_money_and_jokers() {
        let state = shop_state(1, 0);
        assert_eq!(kind(reroll(&state).unwrap_err()), ValidationKind::InsufficientMoney);

        let mut state = shop_state(2, 0);
        assert_eq!(reroll(&state).unwrap(), Outbound::RerollShop);
        state.shop.jokers.clear();
        assert_eq!(kind(reroll(&state).unwrap_err()), ValidationKind::NothingToReroll);
    }

    #[test]
    fn shop_intents_outside_shop_phase_are_rejected() {
        let mut state = shop_state(100, 0);
        state.phase = Phase::Play;
        let item = state.shop.jokers[0].id;
        assert_eq!(kind(buy_joker(&state, item).unwrap_err()), ValidationKind::PhaseMismatch);
    }

    #[test]
    fn sell_uses_catalog_id() {
        let state = shop_state(0, 2);
        let item = state.jokers[1].id;
        assert_eq!(
            sell_joker(&state, item).unwrap(),
            Outbound::SellJoker { joker_id: 1 }
        );
    }
}
