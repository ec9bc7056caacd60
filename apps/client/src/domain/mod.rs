//! Domain layer: card and item value types plus reference catalogs.

pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod catalog;
pub mod items;

// Re-exports for ergonomics
pub use cards_types::{Card, Rank, Suit};
pub use catalog::{Catalog, HandType, PackContent, TargetType};
pub use items::{
    CardItem, IdGenerator, ItemId, JokerItem, JokerOffer, OwnedJoker, OwnedVoucher, PackageItem,
    ShopEntry, ShopJoker, ShopPack, ShopVoucher, VoucherItem, VoucherOffer,
};
