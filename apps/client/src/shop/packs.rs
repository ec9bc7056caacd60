//! Two-phase pack purchase: the purchase reveals contents into a pending
//! holder, the player picks up to the pack's choose amount, and the
//! selection confirmation moves the chosen items into owned collections.

use tracing::{debug, warn};

use crate::domain::catalog::PackContent;
use crate::domain::items::wrap_all;
use crate::domain::{Catalog, ItemId, PackageItem};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::protocol::inbound::{joker_entries, voucher_entries, PackPurchased, PackSelectionComplete};
use crate::protocol::Outbound;
use crate::session::state::{PendingPack, SessionState, JOKER_CAPACITY};

pub fn pack_purchased(state: &mut SessionState, catalog: &Catalog, confirmed: &PackPurchased) {
    let row_pos = state
        .shop
        .packs
        .iter()
        .position(|e| e.offer.shop_id == confirmed.item_id);
    let row: Option<PackageItem> = row_pos.map(|pos| state.shop.packs.remove(pos));
    let def = catalog.pack(confirmed.pack_id);

    let content = row
        .as_ref()
        .map(|r| r.offer.content)
        .or(def.map(|d| d.content))
        .unwrap_or(PackContent::Cards);
    let choose_amount = confirmed
        .choose_amount
        .or(row.as_ref().map(|r| r.offer.choose_amount))
        .or(def.map(|d| d.choose_amount))
        .unwrap_or(1);

    let contents = &confirmed.contents;
    let pending = PendingPack {
        shop_id: confirmed.item_id,
        pack_id: confirmed.pack_id,
        content,
        choose_amount,
        cards: wrap_all(contents.cards.clone(), &mut state.ids),
        jokers: wrap_all(joker_entries(&contents.jokers), &mut state.ids),
        vouchers: wrap_all(voucher_entries(&contents.vouchers, None), &mut state.ids),
    };
    debug!(
        pack_id = pending.pack_id,
        choose_amount,
        offered = pending.cards.len() + pending.jokers.len() + pending.vouchers.len(),
        "[SHOP] pack opened"
    );
    state.pending_pack = Some(pending);
    state.money = confirmed.remaining_money;
}

fn no_open_pack() -> DomainError {
    DomainError::validation(ValidationKind::UnknownItem, "no pack is open")
}

/// Flip selection of an item in the open pack, refusing to go past the
/// choose amount or past the free joker slots.
pub fn toggle_pack_item(state: &mut SessionState, item: ItemId) -> Result<(), DomainError> {
    let owned_jokers = state.jokers.len();
    let pending = state.pending_pack.as_mut().ok_or_else(no_open_pack)?;
    let picked = pending.picked_count();
    let limit = pending.choose_amount as usize;
    let picked_jokers = pending.jokers.iter().filter(|j| j.picked).count();

    let full = |already: bool| !already && picked >= limit;
    if let Some(card) = pending.cards.iter_mut().find(|c| c.id == item) {
        if full(card.picked) {
            return Err(pack_limit(limit));
        }
        card.picked = !card.picked;
        return Ok(());
    }
    if let Some(joker) = pending.jokers.iter_mut().find(|j| j.id == item) {
        if full(joker.picked) {
            return Err(pack_limit(limit));
        }
        if !joker.picked && owned_jokers + picked_jokers >= JOKER_CAPACITY {
            return Err(DomainError::validation(
                ValidationKind::JokerCapacity,
                format!("{owned_jokers} jokers owned"),
            ));
        }
        joker.picked = !joker.picked;
        return Ok(());
    }
    if let Some(voucher) = pending.vouchers.iter_mut().find(|v| v.id == item) {
        if full(voucher.picked) {
            return Err(pack_limit(limit));
        }
        voucher.picked = !voucher.picked;
        return Ok(());
    }
    Err(DomainError::validation(
        ValidationKind::UnknownItem,
        format!("{item} is not in the open pack"),
    ))
}

fn pack_limit(limit: usize) -> DomainError {
    DomainError::validation(ValidationKind::PackLimit, format!("pack allows {limit} picks"))
}

/// Build `choose_pack_items` from the current picks. Picking nothing skips
/// the pack.
pub fn choose_pack_items(state: &SessionState) -> Result<Outbound, DomainError> {
    let pending = state.pending_pack.as_ref().ok_or_else(no_open_pack)?;
    if pending.picked_count() > pending.choose_amount as usize {
        return Err(pack_limit(pending.choose_amount as usize));
    }
    Ok(Outbound::ChoosePackItems {
        pack_id: pending.pack_id,
        cards: pending
            .cards
            .iter()
            .filter(|c| c.picked)
            .map(|c| c.card)
            .collect(),
        jokers: pending
            .jokers
            .iter()
            .filter(|j| j.picked)
            .map(|j| j.joker.joker_id)
            .collect(),
        vouchers: pending
            .vouchers
            .iter()
            .filter(|v| v.picked)
            .map(|v| v.voucher.voucher_id)
            .collect(),
    })
}

/// The server's record of what was taken from the pack is authoritative;
/// local picks are discarded with the holder.
pub fn pack_selection_complete(state: &mut SessionState, confirmed: &PackSelectionComplete) {
    if state.pending_pack.take().is_none() {
        warn!("[SHOP] pack selection confirmed without an open pack");
    }
    let selected = &confirmed.selected;

    state.deck_left.extend(selected.cards.iter().copied());
    let added_cards = i64::try_from(selected.cards.len()).unwrap_or(i64::MAX);
    state.deck_size += added_cards;
    state.deck_left_count += added_cards;

    let mut jokers = wrap_all(joker_entries(&selected.jokers), &mut state.ids);
    state.jokers.append(&mut jokers);
    let mut vouchers = wrap_all(voucher_entries(&selected.vouchers, None), &mut state.ids);
    state.vouchers.append(&mut vouchers);

    if let Some(money) = confirmed.remaining_money {
        state.money = money;
    }
}
