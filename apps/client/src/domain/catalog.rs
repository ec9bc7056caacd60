//! Reference catalogs: read-only lookup tables keyed by small integer ids.
//!
//! The server owns the authoritative versions. The client only needs the
//! parts that drive local behavior: base scores per hand type (for the
//! reveal), voucher target types (for the active-voucher filter) and pack
//! content/choose amounts (for shop validation).

/// Base blue/red score of a hand type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandType {
    pub name: &'static str,
    pub blue: i64,
    pub red: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    /// Sent to a chosen player (or self).
    Targeted,
    /// Affects everyone; never accumulates in the active set.
    NonTargeted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JokerDef {
    pub id: u32,
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoucherDef {
    pub id: u32,
    pub name: &'static str,
    pub target: TargetType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackContent {
    Cards,
    Jokers,
    Vouchers,
}

impl PackContent {
    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cards" | "card" => Some(PackContent::Cards),
            "jokers" | "joker" => Some(PackContent::Jokers),
            "vouchers" | "voucher" | "modifiers" => Some(PackContent::Vouchers),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackDef {
    pub id: u32,
    pub name: &'static str,
    pub content: PackContent,
    pub choose_amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    hand_types: Vec<HandType>,
    jokers: Vec<JokerDef>,
    vouchers: Vec<VoucherDef>,
    packs: Vec<PackDef>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    pub fn new(
        hand_types: Vec<HandType>,
        jokers: Vec<JokerDef>,
        vouchers: Vec<VoucherDef>,
        packs: Vec<PackDef>,
    ) -> Self {
        Self {
            hand_types,
            jokers,
            vouchers,
            packs,
        }
    }

    pub fn standard() -> Self {
        let hand = |name, blue, red| HandType { name, blue, red };
        Self {
            hand_types: vec![
                hand("High Card", 5, 1),
                hand("Pair", 10, 2),
                hand("Two Pair", 20, 2),
                hand("Three of a Kind", 30, 3),
                hand("Straight", 30, 4),
                hand("Flush", 35, 4),
                hand("Full House", 40, 4),
                hand("Four of a Kind", 60, 7),
                hand("Straight Flush", 100, 8),
                hand("Royal Flush", 100, 8),
                hand("Five of a Kind", 120, 12),
                hand("Flush House", 140, 14),
                hand("Flush Five", 160, 16),
            ],
            jokers: vec![
                JokerDef {
                    id: 1,
                    name: "Average size Michael",
                },
                JokerDef {
                    id: 2,
                    name: "Glass joker",
                },
            ],
            vouchers: vec![
                VoucherDef {
                    id: 1,
                    name: "Wheel of fortune",
                    target: TargetType::Targeted,
                },
                VoucherDef {
                    id: 2,
                    name: "Glass",
                    target: TargetType::NonTargeted,
                },
                VoucherDef {
                    id: 3,
                    name: "Average size Michael",
                    target: TargetType::Targeted,
                },
                VoucherDef {
                    id: 4,
                    name: "Blackout",
                    target: TargetType::NonTargeted,
                },
            ],
            packs: vec![
                PackDef {
                    id: 1,
                    name: "Standard pack",
                    content: PackContent::Cards,
                    choose_amount: 1,
                },
                PackDef {
                    id: 2,
                    name: "Buffoon pack",
                    content: PackContent::Jokers,
                    choose_amount: 1,
                },
                PackDef {
                    id: 3,
                    name: "Voucher pack",
                    content: PackContent::Vouchers,
                    choose_amount: 1,
                },
                PackDef {
                    id: 4,
                    name: "Jumbo standard pack",
                    content: PackContent::Cards,
                    choose_amount: 2,
                },
            ],
        }
    }

    /// Hand type at a 0-based index; the table length bounds valid indices.
    pub fn hand_type(&self, index: usize) -> Option<&HandType> {
        self.hand_types.get(index)
    }

    pub fn hand_type_count(&self) -> usize {
        self.hand_types.len()
    }

    pub fn joker(&self, id: u32) -> Option<&JokerDef> {
        self.jokers.iter().find(|j| j.id == id)
    }

    pub fn voucher(&self, id: u32) -> Option<&VoucherDef> {
        self.vouchers.iter().find(|v| v.id == id)
    }

    pub fn pack(&self, id: u32) -> Option<&PackDef> {
        self.packs.iter().find(|p| p.id == id)
    }

    /// Unknown vouchers count as targeted so they are never filtered away.
    pub fn is_non_targeted(&self, voucher_id: u32) -> bool {
        matches!(
            self.voucher(voucher_id).map(|v| v.target),
            Some(TargetType::NonTargeted)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_type_lookup_is_bounded_by_table_length() {
        let catalog = Catalog::standard();
        let last = catalog.hand_type_count() - 1;
        assert!(catalog.hand_type(last).is_some());
        assert!(catalog.hand_type(last + 1).is_none());
    }

    #[test]
    fn unknown_voucher_is_treated_as_targeted() {
        let catalog = Catalog::standard();
        assert!(catalog.is_non_targeted(2));
        assert!(!catalog.is_non_targeted(1));
        assert!(!catalog.is_non_targeted(999));
    }

    #[test]
    fn pack_content_accepts_singular_and_plural() {
        assert_eq!(PackContent::from_wire("Jokers"), Some(PackContent::Jokers));
        assert_eq!(PackContent::from_wire("card"), Some(PackContent::Cards));
        assert_eq!(PackContent::from_wire("mystery"), None);
    }
}
