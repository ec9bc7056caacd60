//! Full-state snapshot reconciliation through `GameSession`.

mod common;

use client::protocol::Outbound;
use client::session::state::Phase;
use client_test_support::payloads;
use common::{deliver, names, session, LOBBY, NOW};
use serde_json::json;
use time::Duration;

fn play_snapshot() -> serde_json::Value {
    payloads::snapshot("play_round", payloads::player_data(12, payloads::full_hand()))
}

#[test]
fn applying_the_same_snapshot_twice_is_a_no_op() {
    let mut session = session();
    deliver(&mut session, "game_phase_player_info", play_snapshot());
    let first = session.state().clone();

    deliver(&mut session, "game_phase_player_info", play_snapshot());
    assert_eq!(session.state(), &first);
}

#[test]
fn reapplied_snapshot_keeps_ids_and_selection() {
    let mut session = session();
    deliver(&mut session, "game_phase_player_info", play_snapshot());
    let picked = session.state().hand.cards()[3].id;
    session.handle_intent(client::runtime::UserIntent::TogglePick(picked));

    deliver(&mut session, "game_phase_player_info", play_snapshot());
    let card = &session.state().hand.cards()[3];
    assert_eq!(card.id, picked);
    assert!(card.picked);
}

#[test]
fn score_to_beat_is_blind_minus_points() {
    let mut session = session();
    let data = payloads::with(
        payloads::player_data(12, payloads::full_hand()),
        json!({"total_points": 120, "played_cards": 8}),
    );
    deliver(
        &mut session,
        "game_phase_player_info",
        payloads::snapshot("play_round", data),
    );
    let state = session.state();
    assert_eq!(state.min_score, 180);
    assert_eq!(state.deck_size, 52);
    assert_eq!(state.deck_left_count, 44);
    assert_eq!(state.money, 12);
    assert_eq!(state.round, 1);
    assert_eq!(state.max_rounds, 5);
}

#[test]
fn unknown_phase_retries_after_a_delay() {
    let mut session = session();
    let out = deliver(
        &mut session,
        "game_phase_player_info",
        json!({"phase": "lobby"}),
    );
    assert!(out.is_empty());
    assert_eq!(session.state().phase, Phase::None);
    assert_eq!(session.next_due_ms(), Some(500));

    assert!(session.advance(499).is_empty());
    assert_eq!(
        session.advance(500),
        vec![Outbound::RequestGamePhasePlayerInfo {
            lobby: LOBBY.into()
        }]
    );
}

#[test]
fn snapshot_without_a_phase_keeps_asking() {
    for payload in [json!({"phase": null}), json!({})] {
        let mut session = session();
        let out = deliver(&mut session, "game_phase_player_info", payload);
        assert!(out.is_empty());
        assert_eq!(session.state().phase, Phase::None);
        assert_eq!(session.next_due_ms(), Some(500));
    }
}

#[test]
fn null_counters_do_not_discard_the_snapshot() {
    let mut session = session();
    let mut data = payloads::player_data(7, json!(null));
    data["players_money"] = json!(null);
    deliver(
        &mut session,
        "game_phase_player_info",
        payloads::snapshot("blind", data),
    );
    assert_eq!(session.state().phase, Phase::Blind);
    assert_eq!(session.state().money, 0);
    assert_eq!(session.state().round, 1);
}

#[test]
fn empty_hand_in_play_requests_cards() {
    let mut session = session();
    let out = deliver(
        &mut session,
        "game_phase_player_info",
        payloads::snapshot("play_round", payloads::player_data(0, json!(null))),
    );
    assert_eq!(names(&out), vec!["get_cards"]);
    assert_eq!(session.state().phase, Phase::Play);
}

#[test]
fn entering_play_from_a_snapshot_closes_the_shop() {
    let mut session = session();
    deliver(
        &mut session,
        "starting_shop",
        payloads::starting_shop(
            json!([payloads::shop_joker(11, 1, 4)]),
            json!([]),
            json!([]),
            2,
        ),
    );
    assert_eq!(session.state().shop.jokers.len(), 1);

    deliver(&mut session, "game_phase_player_info", play_snapshot());
    let state = session.state();
    assert_eq!(state.phase, Phase::Play);
    assert!(state.shop.jokers.is_empty());
    assert!(state.pending_pack.is_none());
    assert_eq!(state.hand.cards().len(), 8);
}

#[test]
fn owned_lists_in_either_shape_reconcile_alike() {
    let mut wrapped = session();
    let mut flat = session();
    let data = payloads::player_data(0, json!([]));

    deliver(
        &mut wrapped,
        "game_phase_player_info",
        payloads::snapshot(
            "shop",
            payloads::with(data.clone(), json!({"current_jokers": {"juglares": [1, 2]}})),
        ),
    );
    deliver(
        &mut flat,
        "game_phase_player_info",
        payloads::snapshot(
            "shop",
            payloads::with(data, json!({"current_jokers": [{"joker_id": 1}, {"joker_id": 2}]})),
        ),
    );
    let ids = |s: &client::runtime::GameSession| -> Vec<u32> {
        s.state().jokers.iter().map(|j| j.joker.joker_id).collect()
    };
    assert_eq!(ids(&wrapped), vec![1, 2]);
    assert_eq!(ids(&wrapped), ids(&flat));
}

#[test]
fn countdown_uses_the_timer_start() {
    let mut session = session();
    let started = NOW - Duration::seconds(45);
    let snapshot = payloads::with(
        payloads::snapshot("shop", payloads::player_data(0, json!([]))),
        json!({"timeout": 60, "timeout_start_date": payloads::timestamp(started)}),
    );
    deliver(&mut session, "game_phase_player_info", snapshot);
    assert_eq!(session.state().time_left, 15);
}

#[test]
fn countdown_falls_back_to_phase_duration() {
    let mut session = session();
    deliver(
        &mut session,
        "game_phase_player_info",
        payloads::snapshot("shop", payloads::player_data(0, json!([]))),
    );
    assert_eq!(session.state().time_left, 60);
}

#[test]
fn snapshot_in_vouchers_with_nothing_owned_auto_advances() {
    let mut session = session();
    deliver(
        &mut session,
        "game_phase_player_info",
        payloads::snapshot("vouchers", payloads::player_data(0, json!([]))),
    );
    assert_eq!(session.run_until_idle(), vec![Outbound::ContinueToNextBlind]);
}
