//! UI-addressable item wrappers.
//!
//! A wrapper id is client-local identity for list reconciliation. It is
//! allocated from a monotonically increasing counter, never reused and never
//! derived from the catalog id: two identical jokers get distinct ids.

use std::fmt;

use super::cards_types::Card;
use super::catalog::PackContent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    /// Rebuild an id a user typed back in (e.g. from the command line).
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of wrapper ids for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn next_id(&mut self) -> ItemId {
        self.last += 1;
        ItemId(self.last)
    }

    /// Last id handed out (0 before the first allocation).
    pub fn last(&self) -> u64 {
        self.last
    }
}

/// A wrapper around a semantic value.
pub trait Wrapped: Sized {
    type Value: PartialEq;

    fn id(&self) -> ItemId;
    fn value(&self) -> &Self::Value;
    fn wrap(id: ItemId, value: Self::Value) -> Self;

    /// Carry client-only state (selection) over from a matched wrapper.
    fn inherit(&mut self, _previous: &Self) {}
}

/// Rebuild a collection from server values, reusing the wrapper of an
/// existing item with an equal value (first unmatched, in order). Only
/// values without a match allocate new ids, so re-applying the same list is
/// a no-op.
pub fn rewrap<T: Wrapped>(existing: &[T], incoming: Vec<T::Value>, ids: &mut IdGenerator) -> Vec<T> {
    let mut taken = vec![false; existing.len()];
    incoming
        .into_iter()
        .map(|value| {
            let matched = existing
                .iter()
                .enumerate()
                .position(|(i, item)| !taken[i] && *item.value() == value);
            match matched {
                Some(i) => {
                    taken[i] = true;
                    let mut item = T::wrap(existing[i].id(), value);
                    item.inherit(&existing[i]);
                    item
                }
                None => T::wrap(ids.next_id(), value),
            }
        })
        .collect()
}

/// Wrap fresh values, always allocating new ids.
pub fn wrap_all<T: Wrapped>(values: Vec<T::Value>, ids: &mut IdGenerator) -> Vec<T> {
    values
        .into_iter()
        .map(|value| T::wrap(ids.next_id(), value))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardItem {
    pub id: ItemId,
    pub card: Card,
    pub picked: bool,
}

impl Wrapped for CardItem {
    type Value = Card;

    fn id(&self) -> ItemId {
        self.id
    }
    fn value(&self) -> &Card {
        &self.card
    }
    fn wrap(id: ItemId, card: Card) -> Self {
        Self {
            id,
            card,
            picked: false,
        }
    }
    fn inherit(&mut self, previous: &Self) {
        self.picked = previous.picked;
    }
}

/// An owned joker as the server describes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedJoker {
    pub joker_id: u32,
    pub sell_price: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JokerItem {
    pub id: ItemId,
    pub joker: OwnedJoker,
    pub picked: bool,
}

impl Wrapped for JokerItem {
    type Value = OwnedJoker;

    fn id(&self) -> ItemId {
        self.id
    }
    fn value(&self) -> &OwnedJoker {
        &self.joker
    }
    fn wrap(id: ItemId, joker: OwnedJoker) -> Self {
        Self {
            id,
            joker,
            picked: false,
        }
    }
    fn inherit(&mut self, previous: &Self) {
        self.picked = previous.picked;
    }
}

/// An owned or active voucher. `sender` is set when another player sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedVoucher {
    pub voucher_id: u32,
    pub sender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherItem {
    pub id: ItemId,
    pub voucher: OwnedVoucher,
    pub picked: bool,
}

impl Wrapped for VoucherItem {
    type Value = OwnedVoucher;

    fn id(&self) -> ItemId {
        self.id
    }
    fn value(&self) -> &OwnedVoucher {
        &self.voucher
    }
    fn wrap(id: ItemId, voucher: OwnedVoucher) -> Self {
        Self {
            id,
            voucher,
            picked: false,
        }
    }
    fn inherit(&mut self, previous: &Self) {
        self.picked = previous.picked;
    }
}

/// Joker offered in the shop. `shop_id` is the server's id for the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopJoker {
    pub shop_id: u64,
    pub joker_id: u32,
    pub price: i64,
    pub sell_price: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopVoucher {
    pub shop_id: u64,
    pub voucher_id: u32,
    pub price: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopPack {
    pub shop_id: u64,
    pub pack_id: u32,
    pub price: i64,
    pub content: PackContent,
    pub choose_amount: u32,
}

/// A shop row entry: wrapper id plus the offered value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopEntry<T> {
    pub id: ItemId,
    pub offer: T,
}

impl<T: PartialEq> Wrapped for ShopEntry<T> {
    type Value = T;

    fn id(&self) -> ItemId {
        self.id
    }
    fn value(&self) -> &T {
        &self.offer
    }
    fn wrap(id: ItemId, offer: T) -> Self {
        Self { id, offer }
    }
}

pub type JokerOffer = ShopEntry<ShopJoker>;
pub type VoucherOffer = ShopEntry<ShopVoucher>;
pub type PackageItem = ShopEntry<ShopPack>;
