//! Shop/Economy Subsystem.

pub mod confirmations;
pub mod packs;
pub mod validation;

pub use confirmations::{apply_shop_rows, starting_shop};
