//! Wire tokens for ranks and suits.
//!
//! Ranks travel as `"2"`..`"10"`, `"J"`, `"Q"`, `"K"`, `"A"`; suits as the
//! catalog letters `h`, `s`, `d`, `t` (hearts, spades, diamonds, clubs).

use std::fmt;
use std::str::FromStr;

use super::cards_types::{Rank, Suit};
use crate::errors::domain::DomainError;

impl Rank {
    pub const fn token(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl Suit {
    pub const fn token(self) -> &'static str {
        match self {
            Suit::Hearts => "h",
            Suit::Spades => "s",
            Suit::Diamonds => "d",
            Suit::Clubs => "t",
        }
    }
}

impl FromStr for Rank {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rank = match s.trim().to_ascii_uppercase().as_str() {
            "2" => Rank::Two,
            "3" => Rank::Three,
            "4" => Rank::Four,
            "5" => Rank::Five,
            "6" => Rank::Six,
            "7" => Rank::Seven,
            "8" => Rank::Eight,
            "9" => Rank::Nine,
            "10" | "T" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            "A" | "1" => Rank::Ace,
            _ => return Err(DomainError::ParseCard(format!("invalid rank '{s}'"))),
        };
        Ok(rank)
    }
}

impl FromStr for Suit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" => Ok(Suit::Hearts),
            "s" => Ok(Suit::Spades),
            "d" => Ok(Suit::Diamonds),
            "t" | "c" => Ok(Suit::Clubs),
            _ => Err(DomainError::ParseCard(format!("invalid suit '{s}'"))),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
