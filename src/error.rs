//! Error types shared by tree construction and the solver.

use thiserror::Error;

use crate::cfr::config::ConfigError;

/// Errors raised while validating game rules, building trees or
/// configuring the solver.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unsupported hole card count {0} (only 1 or 2 are supported)")]
    UnsupportedHolecardCount(usize),

    #[error("hole cards may only be dealt in the first round (round {0} deals {1})")]
    HolecardsAfterFirstRound(usize, usize),

    #[error("at least two players are required, got {0}")]
    TooFewPlayers(usize),

    #[error("game rules contain no rounds")]
    NoRounds,

    #[error("deck must contain at least two cards, got {0}")]
    DeckTooSmall(usize),

    #[error("deck contains duplicate card {0}")]
    DuplicateCard(String),

    #[error("round {round} lists {actual} max bets for {expected} players")]
    MaxBetsMismatch {
        round: usize,
        expected: usize,
        actual: usize,
    },

    #[error("round {round} deals {requested} cards but only {remaining} remain")]
    DealExceedsDeck {
        round: usize,
        requested: usize,
        remaining: usize,
    },

    #[error("bet size of round {0} must be positive")]
    ZeroBetSize(usize),

    /// A holding left at a terminal shares a card with every holding of
    /// some opponent. Rules that pass validation never produce one.
    #[error("terminal `{history}` has no payoff entry for player {player} holding {holding}")]
    MissingPayoff {
        history: String,
        player: usize,
        holding: String,
    },

    #[error("invalid card `{0}`")]
    InvalidCard(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
