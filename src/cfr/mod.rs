//! CFR (Counterfactual Regret Minimization) Solver Module.
//!
//! This module provides vanilla CFR over a [`PublicTree`](crate::tree::PublicTree),
//! computing approximate Nash equilibrium strategies for small poker games.
//!
//! # Overview
//!
//! CFR is an iterative algorithm that converges to Nash equilibrium by:
//! 1. Computing counterfactual regret for each action at each decision point
//! 2. Updating strategies to minimize regret over time
//! 3. Averaging strategies across iterations to converge to equilibrium
//!
//! Every iteration is a full, deterministic sweep of the tree. Reach
//! probabilities and counterfactual values are carried as one row per
//! player indexed by hand range, so all private holdings are updated
//! together.
//!
//! # Usage
//!
//! 1. Describe the game with [`GameRules`](crate::tree::GameRules)
//! 2. Build the tree with [`PublicTree::build`](crate::tree::PublicTree::build)
//! 3. Create a [`CFRSolver`] and call [`CFRSolver::train`]
//! 4. Read strategies from the returned [`StrategyProfile`]
//!
//! # Example
//!
//! ```
//! use range_cfr::cfr::{exploitability, CFRConfig, CFRSolver};
//! use range_cfr::games::kuhn;
//! use range_cfr::tree::PublicTree;
//!
//! let tree = PublicTree::build(&kuhn::kuhn_rules()).unwrap();
//! let mut solver = CFRSolver::new(&tree, CFRConfig::default()).unwrap();
//!
//! let profile = solver.train(2_000);
//! assert!(exploitability(&tree, &profile) < 0.05);
//!
//! // Fold, call and raise probabilities with the ace facing a bet.
//! let strategy = profile.probs(1, "A:/r:");
//! assert!(strategy[1] > 0.9);
//! ```

pub mod config;
pub mod evaluation;
pub mod policy;
mod sliceop;
pub mod solver;
pub mod storage;

pub use config::{CFRConfig, CFRStats, ConfigError, ExploitabilityPoint};
pub use evaluation::{best_response_values, expected_values, exploitability};
pub use policy::StrategyProfile;
pub use solver::CFRSolver;
pub use storage::RegretStorage;
