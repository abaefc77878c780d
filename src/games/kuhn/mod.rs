//! Kuhn Poker, used to validate the solver.
//!
//! Kuhn Poker is a simplified poker game used to validate CFR implementations
//! because it has a known, mathematically proven Nash equilibrium.
//!
//! ## Game Rules
//!
//! - 3 cards: Queen, King, Ace (the classic Jack, Queen, King)
//! - 2 players, each antes 1 chip
//! - Each player receives 1 card
//! - Player 0 acts first: Check (call) or Bet (raise, 1 chip)
//! - Player 1 responds based on player 0's action
//! - Higher card wins at showdown
//!
//! ## Game Tree
//!
//! ```text
//! P0 "/"
//! ├── c
//! │   └── P1 "/c"
//! │       ├── c → Showdown (pot = 2)
//! │       └── r
//! │           └── P0 "/cr"
//! │               ├── f → P1 wins (pot = 3)
//! │               └── c → Showdown (pot = 4)
//! └── r
//!     └── P1 "/r"
//!         ├── f → P0 wins (pot = 3)
//!         └── c → Showdown (pot = 4)
//! ```
//!
//! ## Known Nash Equilibrium
//!
//! - **Player 0 with Queen**: Bet with probability α ∈ [0, 1/3]
//! - **Player 0 with King**: Always check
//! - **Player 0 with Ace**: Bet with probability 3α
//! - **Player 1 facing a bet with Queen**: Always fold
//! - **Player 1 facing a bet with King**: Call with probability 1/3
//! - **Player 1 facing a bet with Ace**: Always call
//! - **Player 1 after a check with Queen**: Bet with probability 1/3
//!
//! **Expected Value**: Player 0 EV = -1/18 ≈ -0.0556
//!
//! Half-street Kuhn removes player 1's option to bet after a check.

use crate::cards::card::{Card, RANK_ACE, RANK_KING, RANK_QUEEN, SUIT_SPADES};
use crate::games::leduc::leduc_format;
use crate::tree::{GameRules, RoundInfo};

/// Higher hole card wins.
pub fn kuhn_eval(holecards: &[Card], _board: &[Card]) -> u32 {
    holecards.first().map_or(0, |card| card.rank() as u32)
}

fn kuhn_deck() -> Vec<Card> {
    [RANK_ACE, RANK_KING, RANK_QUEEN]
        .into_iter()
        .map(|rank| Card::new(rank, SUIT_SPADES))
        .collect()
}

fn rules_with_max_bets(max_bets: Vec<u32>) -> GameRules {
    GameRules {
        players: 2,
        deck: kuhn_deck(),
        rounds: vec![RoundInfo::new(1, 0, 1, max_bets)],
        ante: 1,
        blinds: None,
        hand_eval: kuhn_eval,
        infoset_format: leduc_format,
    }
}

/// Rules of Kuhn Poker.
pub fn kuhn_rules() -> GameRules {
    rules_with_max_bets(vec![1, 1])
}

/// Rules of half-street Kuhn Poker: the second player may only check,
/// call or fold.
pub fn half_street_kuhn_rules() -> GameRules {
    rules_with_max_bets(vec![1, 0])
}
