//! Typed schemas for server events.
//!
//! Each event name maps to one payload struct. Payloads are shape-checked
//! here, at the boundary: required scalars must be present, nested lists
//! that are missing or `null` decode as empty, and the two historical
//! shapes of owned-item lists collapse into one.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DefaultOnNull};

use crate::domain::{Card, OwnedJoker, OwnedVoucher};
use crate::errors::domain::DomainError;

/// Phase timer as sent by the server: a duration in seconds, or (in older
/// payloads) the timer start date itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timeout {
    Seconds(i64),
    Date(String),
}

/// An owned joker/voucher: a bare catalog id or an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OwnedEntry {
    Id(u32),
    Object(OwnedObject),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OwnedObject {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub joker_id: Option<u32>,
    #[serde(default)]
    pub voucher_id: Option<u32>,
    #[serde(default)]
    pub modifier_id: Option<u32>,
    #[serde(default)]
    pub sell_price: Option<i64>,
}

impl OwnedEntry {
    /// Catalog id, preferring the specific keys over a generic `id`.
    pub fn catalog_id(&self) -> Option<u32> {
        match self {
            OwnedEntry::Id(id) => Some(*id),
            OwnedEntry::Object(o) => o.joker_id.or(o.voucher_id).or(o.modifier_id).or(o.id),
        }
    }

    fn sell_price(&self) -> Option<i64> {
        match self {
            OwnedEntry::Id(_) => None,
            OwnedEntry::Object(o) => o.sell_price,
        }
    }
}

/// Owned-item list in either of its two shapes.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OwnedList {
    Flat(Vec<OwnedEntry>),
    Wrapped {
        #[serde(alias = "juglares", alias = "vouchers", default)]
        #[serde_as(as = "DefaultOnNull")]
        modifiers: Vec<OwnedEntry>,
    },
}

impl Default for OwnedList {
    fn default() -> Self {
        OwnedList::Flat(Vec::new())
    }
}

impl OwnedList {
    pub fn entries(&self) -> &[OwnedEntry] {
        match self {
            OwnedList::Flat(entries) | OwnedList::Wrapped { modifiers: entries } => entries,
        }
    }

    /// Owned jokers; id 0 marks an empty slot and is skipped.
    pub fn jokers(&self) -> Vec<OwnedJoker> {
        joker_entries(self.entries())
    }

    pub fn vouchers(&self, sender: Option<&str>) -> Vec<OwnedVoucher> {
        voucher_entries(self.entries(), sender)
    }
}

pub fn joker_entries(entries: &[OwnedEntry]) -> Vec<OwnedJoker> {
    entries
        .iter()
        .filter_map(|e| {
            e.catalog_id()
                .filter(|&id| id != 0)
                .map(|joker_id| OwnedJoker {
                    joker_id,
                    sell_price: e.sell_price(),
                })
        })
        .collect()
}

pub fn voucher_entries(entries: &[OwnedEntry], sender: Option<&str>) -> Vec<OwnedVoucher> {
    entries
        .iter()
        .filter_map(OwnedEntry::catalog_id)
        .filter(|&id| id != 0)
        .map(|voucher_id| OwnedVoucher {
            voucher_id,
            sender: sender.map(str::to_owned),
        })
        .collect()
}

/// Roster entry inside game payloads: a bare username or a user object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RosterEntry {
    Name(String),
    User { username: String },
}

impl RosterEntry {
    pub fn username(&self) -> &str {
        match self {
            RosterEntry::Name(name) | RosterEntry::User { username: name } => name,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlayerData {
    #[serde_as(as = "DefaultOnNull")]
    pub hand_plays_left: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub discards_left: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub players_money: i64,
    /// Count of cards left in the deck.
    #[serde_as(as = "DefaultOnNull")]
    pub unplayed_cards: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub played_cards: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub total_points: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub current_hand: Vec<Card>,
    pub current_jokers: Option<OwnedList>,
    pub vouchers: Option<OwnedList>,
    pub active_vouchers: Option<OwnedList>,
}

/// Full snapshot. Every field may be missing or `null`; an empty `phase`
/// means the server is not ready and is retried.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GamePhasePlayerInfo {
    #[serde_as(as = "DefaultOnNull")]
    pub phase: String,
    pub timeout: Option<Timeout>,
    pub timeout_start_date: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    pub current_round: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub current_base_blind: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub current_pot: i64,
    #[serde_as(as = "DefaultOnNull")]
    pub max_rounds: i64,
    pub player_data: Option<PlayerData>,
    pub users_in_lobby: Option<Vec<RosterEntry>>,
    /// Shop rows, when the snapshot is taken during the Shop phase.
    #[serde(alias = "shop_items")]
    pub shop: Option<StartingShop>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartingNextBlind {
    pub base_blind: i64,
    #[serde(default)]
    pub timeout: Option<Timeout>,
    #[serde(default)]
    pub timeout_start_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartingRound {
    pub blind: i64,
    pub round_number: i64,
    #[serde(default)]
    pub timeout: Option<Timeout>,
    #[serde(default)]
    pub timeout_start_date: Option<String>,
    #[serde(default)]
    pub current_deck_size: i64,
    #[serde(default)]
    pub current_pot: i64,
    #[serde(default)]
    pub total_hand_plays: i64,
    #[serde(default)]
    pub total_discards: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopJokerWire {
    pub id: u64,
    pub joker_id: u32,
    pub price: i64,
    #[serde(default)]
    pub sell_price: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopVoucherWire {
    pub id: u64,
    #[serde(alias = "modifier_id")]
    pub voucher_id: u32,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShopPackWire {
    pub id: u64,
    pub pack_id: u32,
    pub price: i64,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub choose_amount: Option<u32>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StartingShop {
    #[serde_as(as = "DefaultOnNull")]
    pub rerolled_items: Vec<ShopJokerWire>,
    #[serde_as(as = "DefaultOnNull")]
    pub fixed_modifiers: Vec<ShopVoucherWire>,
    #[serde_as(as = "DefaultOnNull")]
    pub fixed_packs: Vec<ShopPackWire>,
    pub reroll_price: Option<i64>,
    pub timeout: Option<Timeout>,
    pub timeout_start_date: Option<String>,
    pub players_money: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StartingVouchers {
    pub current_round: Option<i64>,
    pub vouchers: Option<OwnedList>,
    pub users_in_lobby: Option<Vec<RosterEntry>>,
    pub timeout: Option<Timeout>,
    pub timeout_start_date: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayedHand {
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub new_cards: Vec<Card>,
    #[serde(default)]
    pub left_plays: i64,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub unplayed_cards: i64,
    #[serde(rename = "jokersTriggered", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub jokers_triggered: Vec<bool>,
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub scored_cards: Vec<Card>,
    /// 1-based hand type index.
    pub hand_type: i64,
    #[serde(default)]
    pub blue_score: i64,
    #[serde(default)]
    pub red_score: i64,
    pub total_score: i64,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiscardedCards {
    #[serde_as(as = "DefaultOnNull")]
    pub new_cards: Vec<Card>,
    pub left_discards: i64,
    pub unplayed_cards: i64,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GotCards {
    #[serde_as(as = "DefaultOnNull")]
    pub current_hand: Vec<Card>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FullDeck {
    #[serde_as(as = "DefaultOnNull")]
    pub unplayed_cards: Vec<Card>,
    #[serde_as(as = "DefaultOnNull")]
    pub played_cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlindUpdated {
    pub proposed_by: String,
    pub new_blind: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JokerPurchased {
    pub item_id: u64,
    pub joker_id: u32,
    #[serde(default)]
    pub sell_price: Option<i64>,
    #[serde(alias = "money", alias = "players_money", alias = "gold")]
    pub remaining_money: i64,
    #[serde(default)]
    pub replacement: Option<ShopJokerWire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VoucherPurchased {
    pub item_id: u64,
    #[serde(alias = "modifier_id")]
    pub voucher_id: u32,
    #[serde(alias = "money", alias = "players_money", alias = "gold")]
    pub remaining_money: i64,
    #[serde(default)]
    pub replacement: Option<ShopVoucherWire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JokerSold {
    pub joker_id: u32,
    #[serde(alias = "money", alias = "players_money", alias = "gold")]
    pub remaining_money: i64,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RerolledJokers {
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub rerolled_items: Vec<ShopJokerWire>,
    #[serde(alias = "money", alias = "players_money", alias = "gold")]
    pub remaining_money: i64,
    #[serde(default)]
    pub reroll_price: Option<i64>,
}

/// Cards, jokers and vouchers inside a pack.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackContents {
    #[serde_as(as = "DefaultOnNull")]
    pub cards: Vec<Card>,
    #[serde_as(as = "DefaultOnNull")]
    pub jokers: Vec<OwnedEntry>,
    #[serde(alias = "modifiers")]
    #[serde_as(as = "DefaultOnNull")]
    pub vouchers: Vec<OwnedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackPurchased {
    pub item_id: u64,
    pub pack_id: u32,
    #[serde(alias = "money", alias = "players_money", alias = "gold")]
    pub remaining_money: i64,
    #[serde(default)]
    pub choose_amount: Option<u32>,
    #[serde(default)]
    pub contents: PackContents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackSelectionComplete {
    #[serde(alias = "money", alias = "players_money", alias = "gold")]
    pub remaining_money: Option<i64>,
    pub selected: PackContents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModifiersActivated {
    #[serde(alias = "modifiers")]
    pub vouchers: Option<OwnedList>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModifiersReceived {
    #[serde(alias = "vouchers")]
    pub modifiers: Option<OwnedList>,
    pub sender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WinnerWire {
    pub winner_username: String,
    #[serde(default)]
    pub points: i64,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameEnd {
    #[serde_as(as = "DefaultOnNull")]
    pub winners: Vec<WinnerWire>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlayersEliminated {
    #[serde_as(as = "DefaultOnNull")]
    pub eliminated_players: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LobbyInfoPlayer {
    pub username: String,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LobbyInfo {
    #[serde_as(as = "DefaultOnNull")]
    pub players: Vec<LobbyInfoPlayer>,
    pub creator: Option<LobbyInfoPlayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRef {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KickedUser {
    pub kicked_user: String,
}

/// Every server event the client understands.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    ConnectionSuccess,
    JoinedLobby,
    LobbyInfo(LobbyInfo),
    NewUserInLobby(UserRef),
    PlayerLeft(UserRef),
    PlayerKicked(KickedUser),
    YouWereKicked,
    GamePhasePlayerInfo(GamePhasePlayerInfo),
    StartingNextBlind(StartingNextBlind),
    BlindUpdated(BlindUpdated),
    StartingRound(StartingRound),
    GotCards(GotCards),
    PlayedHand(PlayedHand),
    DiscardedCards(DiscardedCards),
    FullDeck(FullDeck),
    StartingShop(StartingShop),
    JokerPurchased(JokerPurchased),
    VoucherPurchased(VoucherPurchased),
    PackPurchased(PackPurchased),
    PackSelectionComplete(PackSelectionComplete),
    JokerSold(JokerSold),
    RerolledJokers(RerolledJokers),
    StartingVouchers(StartingVouchers),
    ModifiersActivated(ModifiersActivated),
    ModifiersReceived(ModifiersReceived),
    GameEnd(GameEnd),
    PlayersEliminated(PlayersEliminated),
    /// No handler exists for this event name.
    Unhandled { name: String },
}

impl InboundEvent {
    /// Decode an event from its name and positional arguments. Only the
    /// first argument carries the payload.
    pub fn decode(name: &str, args: Vec<Value>) -> Result<Self, DomainError> {
        let payload = args.into_iter().next().unwrap_or(Value::Null);
        let event = match name {
            "connection_success" => InboundEvent::ConnectionSuccess,
            "joined_lobby" => InboundEvent::JoinedLobby,
            "you_were_kicked" => InboundEvent::YouWereKicked,
            "lobby_info" => InboundEvent::LobbyInfo(parse(name, payload)?),
            "new_user_in_lobby" => InboundEvent::NewUserInLobby(parse(name, payload)?),
            "player_left" => InboundEvent::PlayerLeft(parse(name, payload)?),
            "player_kicked" | "kick_success" => InboundEvent::PlayerKicked(parse(name, payload)?),
            "game_phase_player_info" => InboundEvent::GamePhasePlayerInfo(parse(name, payload)?),
            "starting_next_blind" => InboundEvent::StartingNextBlind(parse(name, payload)?),
            "blind_updated" => InboundEvent::BlindUpdated(parse(name, payload)?),
            "starting_round" => InboundEvent::StartingRound(parse(name, payload)?),
            "got_cards" => InboundEvent::GotCards(parse(name, payload)?),
            "played_hand" => InboundEvent::PlayedHand(parse(name, payload)?),
            "discarded_cards" => InboundEvent::DiscardedCards(parse(name, payload)?),
            "full_deck" => InboundEvent::FullDeck(parse(name, payload)?),
            "starting_shop" => InboundEvent::StartingShop(parse(name, payload)?),
            "joker_purchased" => InboundEvent::JokerPurchased(parse(name, payload)?),
            "voucher_purchased" => InboundEvent::VoucherPurchased(parse(name, payload)?),
            "pack_purchased" => InboundEvent::PackPurchased(parse(name, payload)?),
            "pack_selection_complete" => {
                InboundEvent::PackSelectionComplete(parse(name, payload)?)
            }
            "joker_sold" => InboundEvent::JokerSold(parse(name, payload)?),
            "rerolled_jokers" => InboundEvent::RerolledJokers(parse(name, payload)?),
            "starting_vouchers" => InboundEvent::StartingVouchers(parse(name, payload)?),
            "modifiers_activated" => InboundEvent::ModifiersActivated(parse(name, payload)?),
            "modifiers_received" => InboundEvent::ModifiersReceived(parse(name, payload)?),
            "game_end" => InboundEvent::GameEnd(parse(name, payload)?),
            "players_eliminated" => InboundEvent::PlayersEliminated(parse(name, payload)?),
            other => InboundEvent::Unhandled {
                name: other.to_owned(),
            },
        };
        Ok(event)
    }
}

/// Deserialize one payload. A missing payload reads as an empty object so
/// all-optional schemas still decode.
fn parse<T: DeserializeOwned>(event: &str, payload: Value) -> Result<T, DomainError> {
    let payload = match payload {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| DomainError::payload(event, e.to_string()))
}
