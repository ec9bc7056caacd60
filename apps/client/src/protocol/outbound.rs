use serde_json::{json, Value};

use crate::domain::Card;
use crate::session::state::JOKER_CAPACITY;

/// Client intents sent to the server. Fire-and-forget: the outcome arrives
/// as a separate inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    JoinLobby {
        lobby: String,
    },
    ExitLobby {
        lobby: String,
    },
    GetLobbyInfo {
        lobby: String,
    },
    StartGame {
        lobby: String,
    },
    KickFromLobby {
        lobby: String,
        username: String,
    },
    RequestGamePhasePlayerInfo {
        lobby: String,
    },
    ProposeBlind {
        blind: i64,
        lobby: String,
    },
    PlayHand {
        cards: Vec<Card>,
        jokers: [u32; JOKER_CAPACITY],
        gold: i64,
    },
    DiscardCards {
        cards: Vec<Card>,
    },
    GetCards,
    GetFullDeck {
        lobby: String,
    },
    BuyJoker {
        id: u64,
        price: i64,
    },
    BuyVoucher {
        id: u64,
        price: i64,
    },
    BuyPack {
        id: u64,
        price: i64,
    },
    SellJoker {
        joker_id: u32,
    },
    RerollShop,
    ChoosePackItems {
        pack_id: u32,
        cards: Vec<Card>,
        jokers: Vec<u32>,
        vouchers: Vec<u32>,
    },
    ContinueToVouchers,
    ContinueToNextBlind,
    ActivateModifiers {
        vouchers: Vec<u32>,
    },
    SendModifiers {
        vouchers: Vec<u32>,
        targets: Vec<String>,
    },
}

impl Outbound {
    pub fn name(&self) -> &'static str {
        match self {
            Outbound::JoinLobby { .. } => "join_lobby",
            Outbound::ExitLobby { .. } => "exit_lobby",
            Outbound::GetLobbyInfo { .. } => "get_lobby_info",
            Outbound::StartGame { .. } => "start_game",
            Outbound::KickFromLobby { .. } => "kick_from_lobby",
            Outbound::RequestGamePhasePlayerInfo { .. } => "request_game_phase_player_info",
            Outbound::ProposeBlind { .. } => "propose_blind",
            Outbound::PlayHand { .. } => "play_hand",
            Outbound::DiscardCards { .. } => "discard_cards",
            Outbound::GetCards => "get_cards",
            Outbound::GetFullDeck { .. } => "get_full_deck",
            Outbound::BuyJoker { .. } => "buy_joker",
            Outbound::BuyVoucher { .. } => "buy_voucher",
            Outbound::BuyPack { .. } => "buy_pack",
            Outbound::SellJoker { .. } => "sell_joker",
            Outbound::RerollShop => "reroll_shop",
            Outbound::ChoosePackItems { .. } => "choose_pack_items",
            Outbound::ContinueToVouchers => "continue_to_vouchers",
            Outbound::ContinueToNextBlind => "continue_to_next_blind",
            Outbound::ActivateModifiers { .. } => "activate_modifiers",
            Outbound::SendModifiers { .. } => "send_modifiers",
        }
    }

    /// Positional Socket.IO arguments, in emit order.
    pub fn args(&self) -> Vec<Value> {
        match self {
            Outbound::JoinLobby { lobby }
            | Outbound::ExitLobby { lobby }
            | Outbound::GetLobbyInfo { lobby }
            | Outbound::StartGame { lobby }
            | Outbound::RequestGamePhasePlayerInfo { lobby }
            | Outbound::GetFullDeck { lobby } => vec![json!(lobby)],
            Outbound::KickFromLobby { lobby, username } => vec![json!(lobby), json!(username)],
            Outbound::ProposeBlind { blind, lobby } => vec![json!(blind), json!(lobby)],
            Outbound::PlayHand { cards, jokers, gold } => vec![json!({
                "cards": cards,
                "jokers": { "juglares": jokers },
                "gold": gold,
            })],
            Outbound::DiscardCards { cards } => vec![json!(cards)],
            Outbound::GetCards
            | Outbound::RerollShop
            | Outbound::ContinueToVouchers
            | Outbound::ContinueToNextBlind => Vec::new(),
            Outbound::BuyJoker { id, price }
            | Outbound::BuyVoucher { id, price }
            | Outbound::BuyPack { id, price } => vec![json!(id), json!(price)],
            Outbound::SellJoker { joker_id } => vec![json!(joker_id)],
            Outbound::ChoosePackItems {
                pack_id,
                cards,
                jokers,
                vouchers,
            } => vec![
                json!(pack_id),
                json!({ "cards": cards, "jokers": jokers, "vouchers": vouchers }),
            ],
            Outbound::ActivateModifiers { vouchers } => vec![nested_ids(vouchers)],
            Outbound::SendModifiers { vouchers, targets } => {
                vec![nested_ids(vouchers), json!(targets)]
            }
        }
    }
}

/// `[[id], [id], ...]`, the shape the modifier endpoints expect.
fn nested_ids(ids: &[u32]) -> Value {
    Value::Array(ids.iter().map(|id| json!([id])).collect())
}
