//! Game rules consumed by the tree builders.
//!
//! `GameRules` is the boundary to concrete game definitions: the core reads
//! deck, betting structure and the two callbacks, but never interprets the
//! hand scores or the shape of the information-set keys.

use crate::cards::{range_size, Card};
use crate::error::SolverError;

/// Maps (hole cards, board) to a score; higher scores win.
pub type HandEvaluator = fn(&[Card], &[Card]) -> u32;

/// Maps (player, hole cards, board, bet history) to an information-set key.
pub type InfoSetFormatter = fn(usize, &[Card], &[Card], &str) -> String;

/// Dealing and betting structure of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundInfo {
    /// Private cards dealt to each player at the start of this round.
    pub holecard_count: usize,
    /// Public cards dealt at the start of this round.
    pub boardcard_count: usize,
    /// Chips added by one raise.
    pub bet_size: u32,
    /// Per-player cap on the round's bet level.
    pub max_bets: Vec<u32>,
}

impl RoundInfo {
    pub fn new(
        holecard_count: usize,
        boardcard_count: usize,
        bet_size: u32,
        max_bets: Vec<u32>,
    ) -> Self {
        Self {
            holecard_count,
            boardcard_count,
            bet_size,
            max_bets,
        }
    }
}

/// Complete definition of a poker variant.
#[derive(Debug, Clone)]
pub struct GameRules {
    pub players: usize,
    pub deck: Vec<Card>,
    pub rounds: Vec<RoundInfo>,
    pub ante: u32,
    /// Blinds posted in seat order starting at seat 0.
    pub blinds: Option<Vec<u32>>,
    pub hand_eval: HandEvaluator,
    pub infoset_format: InfoSetFormatter,
}

impl GameRules {
    /// Hole cards held by each player after the first round.
    pub fn holecard_count(&self) -> usize {
        self.rounds.first().map_or(0, |r| r.holecard_count)
    }

    /// Check that the rules describe a game the builders can expand.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.players < 2 {
            return Err(SolverError::TooFewPlayers(self.players));
        }
        if self.rounds.is_empty() {
            return Err(SolverError::NoRounds);
        }
        if self.deck.len() < 2 {
            return Err(SolverError::DeckTooSmall(self.deck.len()));
        }

        let mut seen = 0u64;
        for card in &self.deck {
            if seen & card.mask() != 0 {
                return Err(SolverError::DuplicateCard(card.to_string()));
            }
            seen |= card.mask();
        }

        range_size(self.holecard_count())?;

        let mut remaining = self.deck.len();
        for (round, info) in self.rounds.iter().enumerate() {
            if round > 0 && info.holecard_count > 0 {
                return Err(SolverError::HolecardsAfterFirstRound(round, info.holecard_count));
            }
            if info.max_bets.len() != self.players {
                return Err(SolverError::MaxBetsMismatch {
                    round,
                    expected: self.players,
                    actual: info.max_bets.len(),
                });
            }
            if info.bet_size == 0 {
                return Err(SolverError::ZeroBetSize(round));
            }

            let requested = info.holecard_count * self.players + info.boardcard_count;
            if requested > remaining {
                return Err(SolverError::DealExceedsDeck {
                    round,
                    requested,
                    remaining,
                });
            }
            remaining -= requested;
        }

        Ok(())
    }

    /// Chips committed by every player before the first action, and the
    /// seat that acts first.
    pub(crate) fn forced_bets(&self) -> (Vec<u32>, Vec<u32>, usize) {
        let mut committed = vec![self.ante; self.players];
        let mut bets = vec![0; self.players];
        let mut next_player = 0;

        if let Some(blinds) = &self.blinds {
            let bet_size = self.rounds[0].bet_size;
            for &blind in blinds {
                committed[next_player] += blind;
                bets[next_player] = (committed[next_player] - self.ante) / bet_size;
                next_player = (next_player + 1) % self.players;
            }
        }

        (committed, bets, next_player)
    }
}
