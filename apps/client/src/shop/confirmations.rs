//! Server confirmations of shop actions.
//!
//! Each confirmation updates one shop row and one owned collection. Money
//! always comes from the server's remaining-money field.

use tracing::{debug, warn};

use crate::domain::catalog::PackContent;
use crate::domain::items::{rewrap, Wrapped};
use crate::domain::{
    Catalog, IdGenerator, JokerItem, OwnedJoker, OwnedVoucher, ShopEntry, ShopJoker, ShopPack,
    ShopVoucher, VoucherItem,
};
use crate::protocol::inbound::{
    JokerPurchased, JokerSold, RerolledJokers, ShopJokerWire, ShopPackWire, ShopVoucherWire,
    StartingShop, VoucherPurchased,
};
use crate::reconcile::ReconcileCtx;
use crate::session::phase::enter_phase;
use crate::session::state::{Phase, SessionState};

pub(crate) fn shop_joker(wire: &ShopJokerWire) -> ShopJoker {
    ShopJoker {
        shop_id: wire.id,
        joker_id: wire.joker_id,
        price: wire.price,
        sell_price: wire.sell_price,
    }
}

pub(crate) fn shop_voucher(wire: &ShopVoucherWire) -> ShopVoucher {
    ShopVoucher {
        shop_id: wire.id,
        voucher_id: wire.voucher_id,
        price: wire.price,
    }
}

/// Content type and choose amount come from the payload when present,
/// otherwise from the catalog.
pub(crate) fn shop_pack(catalog: &Catalog, wire: &ShopPackWire) -> ShopPack {
    let def = catalog.pack(wire.pack_id);
    let content = wire
        .content_type
        .as_deref()
        .and_then(PackContent::from_wire)
        .or(def.map(|d| d.content))
        .unwrap_or(PackContent::Cards);
    let choose_amount = wire
        .choose_amount
        .or(def.map(|d| d.choose_amount))
        .unwrap_or(1);
    ShopPack {
        shop_id: wire.id,
        pack_id: wire.pack_id,
        price: wire.price,
        content,
        choose_amount,
    }
}

/// Replace the three shop rows, keeping wrapper ids of unchanged offers.
pub fn apply_shop_rows(state: &mut SessionState, catalog: &Catalog, shop: &StartingShop) {
    let jokers = shop.rerolled_items.iter().map(shop_joker).collect();
    let vouchers = shop.fixed_modifiers.iter().map(shop_voucher).collect();
    let packs = shop
        .fixed_packs
        .iter()
        .map(|p| shop_pack(catalog, p))
        .collect();

    state.shop.jokers = rewrap(&state.shop.jokers, jokers, &mut state.ids);
    state.shop.vouchers = rewrap(&state.shop.vouchers, vouchers, &mut state.ids);
    state.shop.packs = rewrap(&state.shop.packs, packs, &mut state.ids);
    if let Some(price) = shop.reroll_price {
        state.shop.reroll_price = price;
    }
    if let Some(money) = shop.players_money {
        state.money = money;
    }
}

/// `starting_shop`: enter the Shop phase and fill its rows.
pub fn starting_shop(state: &mut SessionState, ctx: &ReconcileCtx<'_>, shop: &StartingShop) {
    enter_phase(state, Phase::Shop);
    apply_shop_rows(state, ctx.catalog, shop);
    ctx.refresh_time_left(
        state,
        Phase::Shop,
        shop.timeout.as_ref(),
        shop.timeout_start_date.as_deref(),
    );
    debug!(
        jokers = state.shop.jokers.len(),
        vouchers = state.shop.vouchers.len(),
        packs = state.shop.packs.len(),
        "[SHOP] rows populated"
    );
}

/// Remove the row entry with `shop_id`, putting `replacement` in its place.
fn replace_offer<T: Clone + PartialEq>(
    row: &mut Vec<ShopEntry<T>>,
    shop_id: u64,
    key: impl Fn(&T) -> u64,
    replacement: Option<T>,
    ids: &mut IdGenerator,
) -> bool {
    let Some(pos) = row.iter().position(|e| key(&e.offer) == shop_id) else {
        return false;
    };
    match replacement {
        Some(offer) => row[pos] = ShopEntry::wrap(ids.next_id(), offer),
        None => {
            row.remove(pos);
        }
    }
    true
}

pub fn joker_purchased(state: &mut SessionState, confirmed: &JokerPurchased) {
    let replaced = replace_offer(
        &mut state.shop.jokers,
        confirmed.item_id,
        |o: &ShopJoker| o.shop_id,
        confirmed.replacement.as_ref().map(shop_joker),
        &mut state.ids,
    );
    if !replaced {
        debug!(item_id = confirmed.item_id, "[SHOP] purchased joker was not on the row");
    }
    if state.jokers_full() {
        warn!(
            owned = state.jokers.len(),
            "[SHOP] server confirmed a joker beyond local capacity"
        );
    }
    let joker = OwnedJoker {
        joker_id: confirmed.joker_id,
        sell_price: confirmed.sell_price,
    };
    state.jokers.push(JokerItem::wrap(state.ids.next_id(), joker));
    state.money = confirmed.remaining_money;
}

pub fn voucher_purchased(state: &mut SessionState, confirmed: &VoucherPurchased) {
    let replaced = replace_offer(
        &mut state.shop.vouchers,
        confirmed.item_id,
        |o: &ShopVoucher| o.shop_id,
        confirmed.replacement.as_ref().map(shop_voucher),
        &mut state.ids,
    );
    if !replaced {
        debug!(item_id = confirmed.item_id, "[SHOP] purchased voucher was not on the row");
    }
    let voucher = OwnedVoucher {
        voucher_id: confirmed.voucher_id,
        sender: None,
    };
    state.vouchers.push(VoucherItem::wrap(state.ids.next_id(), voucher));
    state.money = confirmed.remaining_money;
}

/// Removes one owned joker with the sold catalog id, a picked one first.
pub fn joker_sold(state: &mut SessionState, confirmed: &JokerSold) {
    let matches = |j: &JokerItem| j.joker.joker_id == confirmed.joker_id;
    let pos = state
        .jokers
        .iter()
        .position(|j| matches(j) && j.picked)
        .or_else(|| state.jokers.iter().position(matches));
    match pos {
        Some(pos) => {
            state.jokers.remove(pos);
        }
        None => debug!(joker_id = confirmed.joker_id, "[SHOP] sold joker not owned locally"),
    }
    state.money = confirmed.remaining_money;
}

pub fn rerolled_jokers(state: &mut SessionState, confirmed: &RerolledJokers) {
    let jokers = confirmed.rerolled_items.iter().map(shop_joker).collect();
    state.shop.jokers = rewrap(&state.shop.jokers, jokers, &mut state.ids);
    if let Some(price) = confirmed.reroll_price {
        state.shop.reroll_price = price;
    }
    state.money = confirmed.remaining_money;
}
