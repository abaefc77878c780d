//! Card representation.
//!
//! A `Card` is an immutable rank/suit pair ordered by rank, then suit.
//! Ranks run 2..=14 (ace high) and suits 1..=4; both map onto a canonical
//! position in the 52-card space that the hand-range indexer relies on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SolverError;

pub const RANK_TWO: u8 = 2;
pub const RANK_TEN: u8 = 10;
pub const RANK_JACK: u8 = 11;
pub const RANK_QUEEN: u8 = 12;
pub const RANK_KING: u8 = 13;
pub const RANK_ACE: u8 = 14;

pub const SUIT_SPADES: u8 = 1;
pub const SUIT_HEARTS: u8 = 2;
pub const SUIT_DIAMONDS: u8 = 3;
pub const SUIT_CLUBS: u8 = 4;

/// Number of cards in the canonical deck.
pub const NUM_CARDS: usize = 52;

/// Rank characters for display, indexed by `rank - 2`.
const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

/// Suit characters for display, indexed by `suit - 1`.
const SUIT_CHARS: [char; 4] = ['s', 'h', 'd', 'c'];

/// A single playing card.
///
/// Field order matters: the derived `Ord` compares rank first, then suit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    rank: u8,
    suit: u8,
}

impl Card {
    /// Create a card from rank (2-14) and suit (1-4).
    ///
    /// # Panics
    /// Panics if either value is out of range.
    #[inline]
    pub fn new(rank: u8, suit: u8) -> Self {
        Self::try_new(rank, suit)
            .unwrap_or_else(|| panic!("invalid card rank {} / suit {}", rank, suit))
    }

    /// Create a card, returning `None` for out-of-range values.
    #[inline]
    pub fn try_new(rank: u8, suit: u8) -> Option<Self> {
        if (RANK_TWO..=RANK_ACE).contains(&rank) && (1..=4).contains(&suit) {
            Some(Self { rank, suit })
        } else {
            None
        }
    }

    /// Create a card from its canonical position (0-51).
    ///
    /// # Panics
    /// Panics if `index >= 52`.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        assert!(index < NUM_CARDS, "card index {} outside the 52-card space", index);
        Self {
            rank: (index / 4) as u8 + RANK_TWO,
            suit: (index % 4) as u8 + 1,
        }
    }

    /// Canonical position in the 52-card space: `(rank - 2) * 4 + (suit - 1)`.
    #[inline]
    pub fn index(&self) -> usize {
        (self.rank - RANK_TWO) as usize * 4 + (self.suit - 1) as usize
    }

    /// Bit for this card in a 52-bit card set.
    #[inline]
    pub fn mask(&self) -> u64 {
        1u64 << self.index()
    }

    #[inline]
    pub fn rank(&self) -> u8 {
        self.rank
    }

    #[inline]
    pub fn suit(&self) -> u8 {
        self.suit
    }

    pub fn rank_char(&self) -> char {
        RANK_CHARS[(self.rank - RANK_TWO) as usize]
    }

    pub fn suit_char(&self) -> char {
        SUIT_CHARS[(self.suit - 1) as usize]
    }
}

/// Union of the card bits of `cards`.
#[inline]
pub fn cards_mask(cards: &[Card]) -> u64 {
    cards.iter().fold(0, |mask, card| mask | card.mask())
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for Card {
    type Err = SolverError;

    /// Parse a card from a string like "As", "Kh", "2c".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(SolverError::InvalidCard(s.to_string()));
        }

        let rank = RANK_CHARS
            .iter()
            .position(|&c| c == chars[0].to_ascii_uppercase())
            .ok_or_else(|| SolverError::InvalidCard(s.to_string()))?;
        let suit = SUIT_CHARS
            .iter()
            .position(|&c| c == chars[1].to_ascii_lowercase())
            .ok_or_else(|| SolverError::InvalidCard(s.to_string()))?;

        Ok(Self::new(rank as u8 + RANK_TWO, suit as u8 + 1))
    }
}

/// Format a card sequence as concatenated two-character names.
pub fn cards_to_string(cards: &[Card]) -> String {
    cards.iter().map(|c| c.to_string()).collect()
}

/// The full 52-card deck in canonical order.
pub fn full_deck() -> Vec<Card> {
    (0..NUM_CARDS).map(Card::from_index).collect()
}
