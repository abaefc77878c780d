//! Leduc Hold'em.
//!
//! ## Game Rules
//!
//! - 6 cards: two suits of Jack, Queen and King
//! - 2 players, each antes 1 chip and receives 1 private card
//! - First round: bets of 2 chips, at most two raises
//! - One public card is dealt
//! - Second round: bets of 4 chips, at most two raises
//! - A private card pairing the board wins, otherwise the higher card
//!
//! Suits only matter for dealing, so information sets are keyed by rank:
//! the tree has 288 of them.

use crate::cards::card::{Card, RANK_JACK, RANK_KING, RANK_QUEEN, SUIT_HEARTS, SUIT_SPADES};
use crate::tree::{GameRules, RoundInfo};

/// Rank-only key: hole rank, first board rank, then the bet history.
pub fn leduc_format(
    _player: usize,
    holecards: &[Card],
    board: &[Card],
    bet_history: &str,
) -> String {
    let mut cards = String::new();
    if let Some(hole) = holecards.first() {
        cards.push(hole.rank_char());
    }
    if let Some(card) = board.first() {
        cards.push(card.rank_char());
    }
    format!("{}:{}:", cards, bet_history)
}

/// A pair beats any high card; otherwise ranks compare high card first.
pub fn leduc_eval(holecards: &[Card], board: &[Card]) -> u32 {
    let hand: Vec<u32> = holecards
        .iter()
        .chain(board)
        .map(|card| card.rank() as u32)
        .collect();
    match hand.as_slice() {
        [a, b, ..] if a == b => 15 * 14 + a,
        [a, b, ..] => a.max(b) * 14 + a.min(b),
        [a] => *a,
        [] => 0,
    }
}

/// Rules of two-player Leduc Hold'em.
pub fn leduc_rules() -> GameRules {
    let mut deck = Vec::with_capacity(6);
    for rank in [RANK_KING, RANK_QUEEN, RANK_JACK] {
        deck.push(Card::new(rank, SUIT_SPADES));
        deck.push(Card::new(rank, SUIT_HEARTS));
    }

    GameRules {
        players: 2,
        deck,
        rounds: vec![
            RoundInfo::new(1, 0, 2, vec![2, 2]),
            RoundInfo::new(0, 1, 4, vec![2, 2]),
        ],
        ante: 1,
        blinds: None,
        hand_eval: leduc_eval,
        infoset_format: leduc_format,
    }
}
