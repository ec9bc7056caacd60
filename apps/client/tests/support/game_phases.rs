//! Drive a `GameSession` into a given phase through server events, the
//! way a live server would.

use client::domain::ItemId;
use client::protocol::Outbound;
use client::runtime::GameSession;
use client_test_support::payloads;
use serde_json::{json, Value};

use crate::common::deliver;

/// Round 1 in Play with a dealt eight-card hand and a blind of 300.
pub fn in_play(session: &mut GameSession) -> Vec<Outbound> {
    let mut out = deliver(session, "starting_round", payloads::starting_round(300, 1));
    out.extend(deliver(session, "got_cards", payloads::got_cards(payloads::full_hand())));
    out
}

/// Shop open with `money`, two jokers, one voucher and one card pack.
pub fn in_shop(session: &mut GameSession, money: i64) {
    deliver(
        session,
        "game_phase_player_info",
        payloads::snapshot("shop", payloads::player_data(money, json!([]))),
    );
    deliver(
        session,
        "starting_shop",
        payloads::starting_shop(
            json!([payloads::shop_joker(11, 1, 4), payloads::shop_joker(12, 2, 20)]),
            json!([payloads::shop_voucher(21, 2, 3)]),
            json!([payloads::shop_pack(31, 1, 4)]),
            2,
        ),
    );
}

/// Vouchers phase owning the given catalog ids.
pub fn in_vouchers(session: &mut GameSession, owned: &[u32]) -> Vec<Outbound> {
    deliver(
        session,
        "starting_vouchers",
        payloads::starting_vouchers(owned, &["ana", "bob", "carol"]),
    )
}

/// Wrapper ids of the first `n` hand cards.
pub fn hand_ids(session: &GameSession, n: usize) -> Vec<ItemId> {
    session.state().hand.cards().iter().take(n).map(|c| c.id).collect()
}

/// Scored-card payload for the first `n` cards of `payloads::full_hand()`.
pub fn scored_prefix(n: usize) -> Value {
    let hand = payloads::full_hand();
    Value::Array(hand.as_array().into_iter().flatten().take(n).cloned().collect())
}
