use crate::domain::items::IdGenerator;
use crate::domain::{CardItem, Card, JokerItem, JokerOffer, PackContent, PackageItem, VoucherItem, VoucherOffer};

/// Joker slots a player can fill.
pub const JOKER_CAPACITY: usize = 5;
/// Cards drawn by the provisional filler.
pub const HAND_SIZE: usize = 8;
/// Cards that can be picked for a single play.
pub const MAX_PICKED: usize = 5;

/// Game phases as the server names them.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Phase {
    /// Before the game started.
    #[default]
    None,
    /// Players propose the score to beat.
    Blind,
    /// Hands are played against the blind.
    Play,
    Shop,
    Vouchers,
    /// Round or game outcome is shown.
    AnnounceWinner,
}

impl Phase {
    /// Numeric code used by the UI layer (`None` is -1).
    pub const fn code(self) -> i8 {
        match self {
            Phase::None => -1,
            Phase::Blind => 0,
            Phase::Play => 1,
            Phase::Shop => 2,
            Phase::Vouchers => 3,
            Phase::AnnounceWinner => 4,
        }
    }

    /// Decode the server's phase vocabulary. Anything else means the server
    /// has no phase for us yet.
    pub fn from_wire(s: &str) -> Option<Phase> {
        match s {
            "none" => Some(Phase::None),
            "blind" => Some(Phase::Blind),
            "play_round" => Some(Phase::Play),
            "shop" => Some(Phase::Shop),
            "vouchers" => Some(Phase::Vouchers),
            "announce_winner" => Some(Phase::AnnounceWinner),
            _ => None,
        }
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            Phase::None => "none",
            Phase::Blind => "blind",
            Phase::Play => "play_round",
            Phase::Shop => "shop",
            Phase::Vouchers => "vouchers",
            Phase::AnnounceWinner => "announce_winner",
        }
    }
}

/// The player's hand. A provisional hand is display filler drawn locally
/// before the server sent cards; nothing may treat it as ground truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hand {
    Provisional(Vec<CardItem>),
    Authoritative(Vec<CardItem>),
}

impl Default for Hand {
    fn default() -> Self {
        Hand::Authoritative(Vec::new())
    }
}

impl Hand {
    pub fn cards(&self) -> &[CardItem] {
        match self {
            Hand::Provisional(cards) | Hand::Authoritative(cards) => cards,
        }
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, Hand::Provisional(_))
    }

    pub fn is_empty(&self) -> bool {
        self.cards().is_empty()
    }

    /// Server-confirmed cards, or nothing while the hand is provisional.
    pub fn authoritative(&self) -> &[CardItem] {
        match self {
            Hand::Authoritative(cards) => cards,
            Hand::Provisional(_) => &[],
        }
    }

    /// Mutable access to confirmed cards. A provisional hand is dropped
    /// first so local edits never build on filler.
    pub fn authoritative_mut(&mut self) -> &mut Vec<CardItem> {
        if self.is_provisional() {
            *self = Hand::Authoritative(Vec::new());
        }
        match self {
            Hand::Authoritative(cards) | Hand::Provisional(cards) => cards,
        }
    }

    pub fn picked_count(&self) -> usize {
        self.cards().iter().filter(|c| c.picked).count()
    }
}

/// The three shop rows. Empty outside the Shop phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopRows {
    pub jokers: Vec<JokerOffer>,
    pub vouchers: Vec<VoucherOffer>,
    pub packs: Vec<PackageItem>,
    pub reroll_price: i64,
}

impl ShopRows {
    pub fn is_empty(&self) -> bool {
        self.jokers.is_empty() && self.vouchers.is_empty() && self.packs.is_empty()
    }
}

/// Contents of a purchased pack awaiting the player's choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPack {
    pub shop_id: u64,
    pub pack_id: u32,
    pub content: PackContent,
    pub choose_amount: u32,
    pub cards: Vec<CardItem>,
    pub jokers: Vec<JokerItem>,
    pub vouchers: Vec<VoucherItem>,
}

impl PendingPack {
    pub fn picked_count(&self) -> usize {
        self.cards.iter().filter(|c| c.picked).count()
            + self.jokers.iter().filter(|j| j.picked).count()
            + self.vouchers.iter().filter(|v| v.picked).count()
    }
}

/// Transient cursor of the score reveal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimVariables {
    /// Run identifier; steps from an older run are ignored.
    pub generation: u64,
    pub running: bool,
    pub hand_type: Option<usize>,
    pub blue: i64,
    pub red: i64,
    pub highlighted_card: Option<usize>,
    pub highlighted_joker: Option<usize>,
    pub activated_jokers: Vec<bool>,
    pub scored_cards: Vec<Card>,
}

impl AnimVariables {
    /// Clear the cursor and invalidate every scheduled step.
    pub fn reset(&mut self) {
        *self = AnimVariables {
            generation: self.generation + 1,
            ..AnimVariables::default()
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    pub username: String,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Winners(Vec<Winner>),
    /// We were knocked out of the game.
    Eliminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyPlayer {
    pub username: String,
    pub is_host: bool,
}

/// Everything the client knows about one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    /// Bumped on every phase entry; tags phase-bound timers.
    pub phase_epoch: u64,

    // Server-authoritative counters
    pub round: i64,
    pub max_rounds: i64,
    pub min_score: i64,
    pub proposed_blind: i64,
    pub pot: i64,
    pub money: i64,
    pub hands: i64,
    pub discards: i64,

    // Cards
    pub hand: Hand,
    pub played_cards: Vec<CardItem>,
    pub deck_left: Vec<Card>,
    pub deck_played: Vec<Card>,
    pub deck_left_count: i64,
    pub deck_size: i64,

    // Owned items
    pub jokers: Vec<JokerItem>,
    pub vouchers: Vec<VoucherItem>,
    pub active_vouchers: Vec<VoucherItem>,

    pub shop: ShopRows,
    pub pending_pack: Option<PendingPack>,

    pub time_left: i64,
    pub action_blocked: bool,
    /// Phase the player asked to leave with a continue intent.
    pub continue_requested_from: Option<Phase>,

    pub anim: AnimVariables,
    pub outcome: Option<Outcome>,
    pub roster: Vec<LobbyPlayer>,

    pub ids: IdGenerator,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn picked_hand_cards(&self) -> Vec<Card> {
        self.hand
            .cards()
            .iter()
            .filter(|c| c.picked)
            .map(|c| c.card)
            .collect()
    }

    pub fn jokers_full(&self) -> bool {
        self.jokers.len() >= JOKER_CAPACITY
    }

    /// Joker slots as sent with `play_hand` (0 marks an empty slot).
    pub fn joker_slots(&self) -> [u32; JOKER_CAPACITY] {
        let mut slots = [0u32; JOKER_CAPACITY];
        for (slot, joker) in slots.iter_mut().zip(&self.jokers) {
            *slot = joker.joker.joker_id;
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_vocabulary_round_trips() {
        for phase in [
            Phase::None,
            Phase::Blind,
            Phase::Play,
            Phase::Shop,
            Phase::Vouchers,
            Phase::AnnounceWinner,
        ] {
            assert_eq!(Phase::from_wire(phase.wire_name()), Some(phase));
        }
        assert_eq!(Phase::from_wire("lobby"), None);
        assert_eq!(Phase::from_wire("PLAY_ROUND"), None);
    }

    #[test]
    fn phase_codes_are_fixed() {
        assert_eq!(Phase::None.code(), -1);
        assert_eq!(Phase::Play.code(), 1);
        assert_eq!(Phase::AnnounceWinner.code(), 4);
    }

    #[test]
    fn provisional_hand_has_no_authoritative_cards() {
        let mut ids = IdGenerator::default();
        let filler = vec![CardItem {
            id: ids.next_id(),
            card: Card::new(crate::domain::Rank::Two, crate::domain::Suit::Hearts),
            picked: false,
        }];
        let mut hand = Hand::Provisional(filler);
        assert!(!hand.is_empty());
        assert!(hand.authoritative().is_empty());

        hand.authoritative_mut().clear();
        assert!(!hand.is_provisional());
    }

    #[test]
    fn anim_reset_bumps_generation() {
        let mut anim = AnimVariables {
            generation: 3,
            blue: 10,
            ..AnimVariables::default()
        };
        anim.reset();
        assert_eq!(anim.generation, 4);
        assert_eq!(anim.blue, 0);
    }
}
