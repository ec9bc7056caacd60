//! Builders for server event payloads.
//!
//! Each builder returns the first positional argument of the event exactly
//! as the server puts it on the wire. Builders take only the fields a test
//! usually varies; chain `with` to set anything else.

use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Wire form of one card, e.g. `card("10", "h")`.
pub fn card(rank: &str, suit: &str) -> Value {
    json!({"Rank": rank, "Suit": suit, "Enhancement": 0})
}

/// Several cards from `"10h"`-style tokens.
pub fn cards(tokens: &[&str]) -> Value {
    Value::Array(
        tokens
            .iter()
            .map(|token| {
                let (rank, suit) = token.split_at(token.len() - 1);
                card(rank, suit)
            })
            .collect(),
    )
}

/// Eight distinct cards, enough for a full hand.
pub fn full_hand() -> Value {
    cards(&["2h", "3h", "4s", "5d", "6t", "7h", "8s", "9d"])
}

/// RFC 3339 rendering of a timestamp, as used by `timeout_start_date`.
pub fn timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_default()
}

/// Shallow-merge `extra` into the object `base`.
pub fn with(mut base: Value, extra: Value) -> Value {
    if let (Some(target), Value::Object(fields)) = (base.as_object_mut(), extra) {
        for (key, value) in fields {
            target.insert(key, value);
        }
    }
    base
}

pub fn player_data(money: i64, hand: Value) -> Value {
    json!({
        "hand_plays_left": 4,
        "discards_left": 3,
        "players_money": money,
        "unplayed_cards": 44,
        "played_cards": 0,
        "total_points": 0,
        "current_hand": hand,
        "current_jokers": {"juglares": []},
        "vouchers": {"modifiers": []},
        "active_vouchers": {"modifiers": []},
    })
}

/// Full-state snapshot for `game_phase_player_info`.
pub fn snapshot(phase: &str, player_data: Value) -> Value {
    json!({
        "phase": phase,
        "current_round": 1,
        "current_base_blind": 300,
        "current_pot": 10,
        "max_rounds": 5,
        "player_data": player_data,
        "users_in_lobby": ["ana", "bob"],
    })
}

pub fn starting_next_blind(base_blind: i64) -> Value {
    json!({"base_blind": base_blind, "timeout": 30})
}

pub fn blind_updated(proposed_by: &str, new_blind: i64) -> Value {
    json!({"proposed_by": proposed_by, "new_blind": new_blind})
}

pub fn starting_round(blind: i64, round_number: i64) -> Value {
    json!({
        "blind": blind,
        "round_number": round_number,
        "timeout": 120,
        "current_deck_size": 52,
        "current_pot": 10,
        "total_hand_plays": 4,
        "total_discards": 3,
    })
}

pub fn got_cards(hand: Value) -> Value {
    json!({"current_hand": hand})
}

/// `played_hand` confirmation. `hand_type` is 1-based as on the wire.
pub fn played_hand(hand_type: i64, scored: Value, jokers_triggered: &[bool], blue: i64, red: i64) -> Value {
    json!({
        "new_cards": [],
        "left_plays": 3,
        "gold": 10,
        "unplayed_cards": 40,
        "jokersTriggered": jokers_triggered,
        "scored_cards": scored,
        "hand_type": hand_type,
        "blue_score": blue,
        "red_score": red,
        "total_score": blue * red,
    })
}

pub fn discarded_cards(new_cards: Value, left_discards: i64) -> Value {
    json!({"new_cards": new_cards, "left_discards": left_discards, "unplayed_cards": 40})
}

pub fn full_deck(unplayed: Value, played: Value) -> Value {
    json!({"unplayed_cards": unplayed, "played_cards": played})
}

pub fn shop_joker(id: u64, joker_id: u32, price: i64) -> Value {
    json!({"id": id, "joker_id": joker_id, "price": price, "sell_price": price / 2})
}

pub fn shop_voucher(id: u64, voucher_id: u32, price: i64) -> Value {
    json!({"id": id, "modifier_id": voucher_id, "price": price})
}

pub fn shop_pack(id: u64, pack_id: u32, price: i64) -> Value {
    json!({"id": id, "pack_id": pack_id, "price": price})
}

pub fn starting_shop(jokers: Value, vouchers: Value, packs: Value, reroll_price: i64) -> Value {
    json!({
        "rerolled_items": jokers,
        "fixed_modifiers": vouchers,
        "fixed_packs": packs,
        "reroll_price": reroll_price,
        "timeout": 60,
    })
}

pub fn joker_purchased(item_id: u64, joker_id: u32, money: i64) -> Value {
    json!({"item_id": item_id, "joker_id": joker_id, "sell_price": 2, "remaining_money": money})
}

pub fn voucher_purchased(item_id: u64, voucher_id: u32, money: i64) -> Value {
    json!({"item_id": item_id, "modifier_id": voucher_id, "remaining_money": money})
}

pub fn joker_sold(joker_id: u32, money: i64) -> Value {
    json!({"joker_id": joker_id, "money": money})
}

pub fn rerolled_jokers(jokers: Value, money: i64, reroll_price: i64) -> Value {
    json!({"rerolled_items": jokers, "remaining_money": money, "reroll_price": reroll_price})
}

pub fn pack_purchased(item_id: u64, pack_id: u32, money: i64, contents: Value) -> Value {
    json!({
        "item_id": item_id,
        "pack_id": pack_id,
        "remaining_money": money,
        "contents": contents,
    })
}

pub fn pack_selection_complete(selected: Value) -> Value {
    json!({"selected": selected})
}

pub fn starting_vouchers(owned: &[u32], users: &[&str]) -> Value {
    json!({
        "vouchers": {"modifiers": owned},
        "users_in_lobby": users,
        "timeout": 30,
    })
}

pub fn modifiers_activated(active: &[u32]) -> Value {
    json!({"modifiers": active})
}

pub fn modifiers_received(ids: &[u32], sender: &str) -> Value {
    json!({"modifiers": ids, "sender": sender})
}

pub fn game_end(winners: &[(&str, i64)]) -> Value {
    let winners: Vec<Value> = winners
        .iter()
        .map(|(name, points)| json!({"winner_username": name, "points": points}))
        .collect();
    json!({"winners": winners})
}

pub fn players_eliminated(names: &[&str]) -> Value {
    json!({"eliminated_players": names})
}

pub fn lobby_info(creator: &str, players: &[&str]) -> Value {
    let players: Vec<Value> = players.iter().map(|p| json!({"username": p})).collect();
    json!({"players": players, "creator": {"username": creator}})
}

pub fn user(username: &str) -> Value {
    json!({"username": username})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_split_rank_from_suit() {
        let parsed = cards(&["10h", "Kt"]);
        assert_eq!(parsed[0], card("10", "h"));
        assert_eq!(parsed[1]["Rank"], "K");
        assert_eq!(parsed[1]["Suit"], "t");
    }

    #[test]
    fn with_overrides_fields() {
        let merged = with(starting_next_blind(100), json!({"timeout": null}));
        assert_eq!(merged["base_blind"], 100);
        assert!(merged["timeout"].is_null());
    }
}
