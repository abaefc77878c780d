//! Reference game definitions.
//!
//! Each module supplies a [`GameRules`](crate::tree::GameRules) value for a
//! small poker variant together with its hand evaluator and
//! information-set formatter. These serve as:
//!
//! 1. **Validation**: games with known equilibria (Kuhn Poker) verify that
//!    the solver is correct.
//!
//! 2. **Examples**: they show how to describe a new game to the tree
//!    builder.
//!
//! 3. **Benchmarks**: they provide standardized trees for performance
//!    testing.
//!
//! ## Available Games
//!
//! - [`kuhn`]: Kuhn Poker and its half-street variant, 3 cards, 1 round
//! - [`leduc`]: Leduc Hold'em, 6 cards, 2 rounds with one board card
//! - [`royal`]: Royal Hold'em, 8 cards, 3 rounds with two board cards
//!
//! Information-set keys have the shape `"{cards}:{history}:"`, where
//! `cards` lists hole and board ranks and `history` is the bet history of
//! the node, so `"K:/r:"` is a king facing a bet in the first round.

pub mod kuhn;
pub mod leduc;
pub mod royal;
