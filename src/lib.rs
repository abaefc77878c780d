//! # Range CFR
//!
//! A vanilla Counterfactual Regret Minimization (CFR) solver for small
//! imperfect-information poker games, working on hand ranges instead of
//! individual deals.
//!
//! ## Features
//!
//! - **Hand-Range Indexing**: one- and two-card holdings mapped to dense
//!   array positions through precomputed tables
//! - **Public Game Trees**: betting and dealing expanded once, with private
//!   holdings carried as per-player lists
//! - **Vector-Form CFR**: every holding of every player updated in one
//!   deterministic sweep per iteration
//! - **Exploitability Calculation**: best-response values of any profile
//!
//! ## Quick Start
//!
//! ```
//! use range_cfr::games::leduc;
//!
//! // 1. Build the public tree of a game
//! let tree = range_cfr::build_tree(&leduc::leduc_rules()).unwrap();
//!
//! // 2. Train
//! let profile = range_cfr::train(&tree, 50).unwrap();
//!
//! // 3. Read strategies (fold, call, raise)
//! let strategy = profile.probs(0, "K:/:");
//! assert!((strategy.iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`cards`]: card model and hand-range indexer
//! - [`tree`]: game rules, tree nodes, builders and the information-set registry
//! - [`cfr`]: solver, strategy profiles and evaluation
//! - [`games`]: Kuhn, Leduc and Royal reference games
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌───────────────────┐
//! │  GameRules   │ ──▶ │   TreeBuilder    │ ──▶ │    PublicTree     │
//! │ (games::*)   │     │ + InfoSetRegistry│     │  (immutable)      │
//! └──────────────┘     └──────────────────┘     └───────────────────┘
//!                                                         │
//!                                                         ▼
//!                      ┌──────────────────┐     ┌───────────────────┐
//!                      │ StrategyProfile  │ ◀── │    CFRSolver      │
//!                      │  (average)       │     │ regrets, sums     │
//!                      └──────────────────┘     └───────────────────┘
//! ```
//!
//! The crate logs through the [`log`] facade and never installs a logger.

/// Cards and hand-range indexing.
pub mod cards;

/// CFR (Counterfactual Regret Minimization) solver module.
pub mod cfr;

/// Error types.
pub mod error;

/// Reference game implementations.
pub mod games;

/// Game rules and trees.
pub mod tree;

pub use cfr::{CFRConfig, CFRSolver, CFRStats, StrategyProfile};
pub use error::SolverError;
pub use tree::{GameRules, GameTree, PublicTree, RoundInfo};

/// Build the public tree of `rules` with its information-set registry.
pub fn build_tree(rules: &GameRules) -> Result<PublicTree, SolverError> {
    PublicTree::build(rules)
}

/// Train a solver with the default configuration for `iterations` sweeps
/// and return the average profile.
pub fn train(tree: &PublicTree, iterations: u64) -> Result<StrategyProfile, SolverError> {
    let mut solver = CFRSolver::new(tree, CFRConfig::default())?;
    Ok(solver.train(iterations))
}
