//! Vanilla Counterfactual Regret Minimization over a public tree.
//!
//! One iteration is a full sweep of the tree. Reach probabilities travel
//! down as flat `[player][range index]` rows and counterfactual values come
//! back up in the same layout, so every holding of every player is updated
//! in a single pass:
//!
//! - **Terminal**: payoffs weighted by the opponents' reach, averaged over
//!   the payoff entries sharing each holding, then scaled by the chance
//!   probability of the path.
//! - **Chance**: chance probability scaled by one over the number of deals,
//!   children summed. The factor travels as one scalar next to the reach
//!   rows, so it counts once per entry whatever the number of players.
//! - **Action**: regret matching per holding, strategy sums weighted by the
//!   acting player's own reach, one recursion per legal action, then regret
//!   accumulation against the node value.
//!
//! The sweep is deterministic: two solvers trained for the same number of
//! iterations on the same tree produce bit-identical profiles.

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::cfr::config::{CFRConfig, CFRStats};
use crate::cfr::evaluation::{self, initial_reach, terminal_values};
use crate::cfr::policy::StrategyProfile;
use crate::cfr::sliceop::{add_slice, row, row_mut};
use crate::cfr::storage::RegretStorage;
use crate::error::SolverError;
use crate::tree::{Action, ActionNode, ChanceNode, Node, PublicTree};

/// The main CFR solver.
///
/// The solver borrows an immutable [`PublicTree`] and owns all mutable
/// state: the regret table, the strategy sums and the current profile.
/// Several solvers may run on one tree.
///
/// # Example
/// ```
/// use range_cfr::cfr::{CFRConfig, CFRSolver};
/// use range_cfr::games::kuhn;
/// use range_cfr::tree::PublicTree;
///
/// let tree = PublicTree::build(&kuhn::kuhn_rules()).unwrap();
/// let mut solver = CFRSolver::new(&tree, CFRConfig::default()).unwrap();
/// let profile = solver.train(1_000);
///
/// let bet = profile.probs(0, "A:/:");
/// assert!((bet.iter().sum::<f64>() - 1.0).abs() < 1e-9);
/// ```
pub struct CFRSolver<'t> {
    /// The tree being solved.
    tree: &'t PublicTree,

    /// Configuration for the solver.
    config: CFRConfig,

    /// Storage for regrets and strategy sums.
    storage: RegretStorage,

    /// Strategy played at the most recent visit of each information set.
    current: StrategyProfile,

    /// Completed iterations.
    iteration: u64,

    /// Statistics tracking.
    stats: CFRStats,
}

impl<'t> CFRSolver<'t> {
    /// Create a solver for `tree`.
    pub fn new(tree: &'t PublicTree, config: CFRConfig) -> Result<Self, SolverError> {
        config.validate()?;
        Ok(Self {
            tree,
            config,
            storage: RegretStorage::with_capacity(tree.players(), tree.num_info_sets()),
            current: StrategyProfile::new(tree.registry().clone()),
            iteration: 0,
            stats: CFRStats::new(),
        })
    }

    /// Run a single sweep over the whole tree.
    pub fn run_iteration(&mut self) {
        let reach = initial_reach(self.tree);
        let mut sweep = Sweep {
            storage: &mut self.storage,
            current: &mut self.current,
            iteration: self.iteration,
            players: self.tree.players(),
            size: self.tree.range_size(),
        };
        sweep.cfr(self.tree.root(), &reach, 1.0);
        self.iteration += 1;
    }

    /// Run `iterations` sweeps without progress reporting or checkpoints.
    pub fn run(&mut self, iterations: u64) {
        for _ in 0..iterations {
            self.run_iteration();
        }
    }

    /// Train for `iterations` sweeps and return the average profile.
    ///
    /// Progress display, exploitability checkpoints and debug logging
    /// follow the solver's [`CFRConfig`].
    pub fn train(&mut self, iterations: u64) -> StrategyProfile {
        let start_time = Instant::now();
        let progress = self.config.show_progress.then(|| {
            let bar = ProgressBar::new(iterations);
            if let Ok(style) = ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            ) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });

        for i in 0..iterations {
            self.run_iteration();

            if let Some(interval) = self.config.exploitability_interval {
                if (i + 1) % interval == 0 {
                    let exploitability = self.exploitability();
                    self.stats.record_exploitability(self.iteration, exploitability);
                    debug!(
                        "iteration {}: exploitability {:.6}",
                        self.iteration, exploitability
                    );
                }
            }
            if let Some(interval) = self.config.log_interval {
                if (i + 1) % interval == 0 {
                    debug!(
                        "iteration {} ({:.1}s elapsed)",
                        self.iteration,
                        start_time.elapsed().as_secs_f64()
                    );
                }
            }
            if let Some(bar) = &progress {
                bar.inc(1);
            }
        }

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        // Update stats
        self.stats.iterations = self.iteration;
        self.stats.info_sets = self.tree.num_info_sets();
        self.stats.elapsed_seconds = start_time.elapsed().as_secs_f64();
        self.stats.update_rate();
        info!(
            "trained {} iterations over {} information sets in {:.2}s",
            iterations, self.stats.info_sets, self.stats.elapsed_seconds
        );

        self.average_profile()
    }

    /// Average strategy accumulated so far.
    pub fn average_profile(&self) -> StrategyProfile {
        let mut profile = StrategyProfile::new(self.tree.registry().clone());
        for (id, set) in self.tree.registry().iter() {
            profile.set(id, self.storage.average_strategy(id, set.player, set.legal));
        }
        profile
    }

    /// Exploitability of the current average strategy.
    pub fn exploitability(&self) -> f64 {
        evaluation::exploitability(self.tree, &self.average_profile())
    }

    /// Strategy played at the most recent visit of each information set.
    pub fn current_profile(&self) -> &StrategyProfile {
        &self.current
    }

    /// Get the current iteration count.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Get current statistics.
    pub fn stats(&self) -> &CFRStats {
        &self.stats
    }

    /// Get reference to the storage for analysis.
    pub fn storage(&self) -> &RegretStorage {
        &self.storage
    }

    /// Get reference to the tree.
    pub fn tree(&self) -> &'t PublicTree {
        self.tree
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &CFRConfig {
        &self.config
    }

    /// Reset the solver to initial state.
    pub fn reset(&mut self) {
        self.storage.clear();
        self.current = StrategyProfile::new(self.tree.registry().clone());
        self.iteration = 0;
        self.stats = CFRStats::new();
    }
}

/// Mutable state borrowed for one sweep.
struct Sweep<'s> {
    storage: &'s mut RegretStorage,
    current: &'s mut StrategyProfile,
    iteration: u64,
    players: usize,
    size: usize,
}

impl Sweep<'_> {
    fn cfr(&mut self, node: &Node, reach: &[f64], chance: f64) -> Vec<f64> {
        match node {
            Node::Terminal(terminal) => terminal_values(terminal, reach, self.size, chance),
            Node::HolecardChance(deal) | Node::BoardcardChance(deal) => {
                self.chance(deal, reach, chance)
            }
            Node::Action(action) => self.action(action, reach, chance),
        }
    }

    /// Chance probability travels as a scalar; reach rows are left as is.
    fn chance(&mut self, node: &ChanceNode, reach: &[f64], chance: f64) -> Vec<f64> {
        let chance = chance / node.deal_count;
        let mut values = vec![0.0; reach.len()];
        for child in &node.children {
            add_slice(&mut values, &self.cfr(child, reach, chance));
        }
        values
    }

    fn action(&mut self, node: &ActionNode, reach: &[f64], chance: f64) -> Vec<f64> {
        let player = node.player;
        let size = self.size;
        let holdings = &node.info.holecards[player];

        let mut strategies = Vec::with_capacity(holdings.len());
        for (&id, &hand) in node.infosets.iter().zip(holdings) {
            let strategy = if self.iteration == 0 {
                node.legal.uniform()
            } else {
                self.storage.regret_matching(id, player, node.legal)
            };
            self.current.set(id, strategy);
            self.storage
                .update_strategy_sum(id, player, &strategy, reach[player * size + hand]);
            strategies.push(strategy);
        }

        let mut values = vec![0.0; reach.len()];
        let mut action_values: [Option<Vec<f64>>; 3] = [None, None, None];
        for (action, child) in node.children() {
            let mut next = reach.to_vec();
            for (strategy, &hand) in strategies.iter().zip(holdings) {
                next[player * size + hand] *= strategy[action.index()];
            }

            let child_values = self.cfr(child, &next, chance);
            for p in (0..self.players).filter(|&p| p != player) {
                add_slice(row_mut(&mut values, p, size), row(&child_values, p, size));
            }
            for (strategy, &hand) in strategies.iter().zip(holdings) {
                let i = player * size + hand;
                values[i] += strategy[action.index()] * child_values[i];
            }
            action_values[action.index()] = Some(row(&child_values, player, size).to_vec());
        }

        for action in Action::ALL {
            let Some(own) = &action_values[action.index()] else {
                continue;
            };
            for (&id, &hand) in node.infosets.iter().zip(holdings) {
                let regret = own[hand] - values[player * size + hand];
                self.storage.add_regret(id, player, action, regret);
            }
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::config::CFRConfig;
    use crate::games::{kuhn, leduc};

    #[test]
    fn test_kuhn_convergence() {
        let tree = PublicTree::build(&kuhn::kuhn_rules()).unwrap();
        let mut solver = CFRSolver::new(&tree, CFRConfig::default()).unwrap();
        let profile = solver.train(20_000);

        let ev = evaluation::expected_values(&tree, &profile);
        let exploitability = evaluation::exploitability(&tree, &profile);
        println!("Kuhn EV after 20000 iterations: {:?}", ev);
        println!("Kuhn exploitability: {:.6}", exploitability);

        assert!(
            (ev[0] + 1.0 / 18.0).abs() < 1e-2,
            "player 0 EV {} should approach -1/18",
            ev[0]
        );
        assert!(exploitability < 0.01, "exploitability {}", exploitability);

        // Strategy features shared by every Kuhn equilibrium.
        assert!(profile.probs(1, "A:/r:")[Action::Call.index()] > 0.95);
        assert!(profile.probs(1, "Q:/r:")[Action::Fold.index()] > 0.95);
        assert!(profile.probs(0, "K:/:")[Action::Call.index()] > 0.9);
        let bluff = profile.probs(1, "Q:/c:")[Action::Raise.index()];
        assert!((bluff - 1.0 / 3.0).abs() < 0.05, "bluff frequency {}", bluff);
    }

    #[test]
    fn test_exploitability_decreases() {
        let tree = PublicTree::build(&kuhn::kuhn_rules()).unwrap();
        let config = CFRConfig::default().with_exploitability_interval(100);
        let mut solver = CFRSolver::new(&tree, config).unwrap();
        solver.train(2_000);

        let history = &solver.stats().exploitability_history;
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].iteration, 100);
        let first = history[0].exploitability;
        let last = history[history.len() - 1].exploitability;
        assert!(last < first, "exploitability went from {} to {}", first, last);
        assert_eq!(solver.stats().exploitability, Some(last));
    }

    #[test]
    fn test_first_iteration_plays_uniform() {
        let tree = PublicTree::build(&kuhn::kuhn_rules()).unwrap();
        let mut solver = CFRSolver::new(&tree, CFRConfig::default()).unwrap();
        solver.run_iteration();

        for (id, set) in tree.registry().iter() {
            assert_eq!(solver.current_profile().probs_by_id(id), set.legal.uniform());
        }
        assert_eq!(solver.iteration(), 1);
    }

    #[test]
    fn test_profiles_sum_to_one_over_legal_actions() {
        let tree = PublicTree::build(&leduc::leduc_rules()).unwrap();
        let mut solver = CFRSolver::new(&tree, CFRConfig::default()).unwrap();
        let profile = solver.train(20);

        for (id, set) in tree.registry().iter() {
            let probs = profile.probs_by_id(id);
            assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
            for action in Action::ALL {
                if !set.legal.contains(action) {
                    assert_eq!(probs[action.index()], 0.0);
                }
            }
            let current = solver.current_profile().probs_by_id(id);
            assert!((current.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_training_is_deterministic() {
        let tree = PublicTree::build(&leduc::leduc_rules()).unwrap();
        let mut first = CFRSolver::new(&tree, CFRConfig::default()).unwrap();
        let mut second = CFRSolver::new(&tree, CFRConfig::default()).unwrap();
        let a = first.train(100);
        let b = second.train(100);

        for ((_, key_a, probs_a), (_, key_b, probs_b)) in a.iter().zip(b.iter()) {
            assert_eq!(key_a, key_b);
            for i in 0..3 {
                assert_eq!(probs_a[i].to_bits(), probs_b[i].to_bits(), "{}", key_a);
            }
        }
    }

    #[test]
    fn test_reset_restarts_training() {
        let tree = PublicTree::build(&kuhn::kuhn_rules()).unwrap();
        let mut solver = CFRSolver::new(&tree, CFRConfig::default()).unwrap();
        let before = solver.train(50);
        assert_eq!(solver.stats().iterations, 50);

        solver.reset();
        assert_eq!(solver.iteration(), 0);
        let after = solver.train(50);
        for ((_, _, a), (_, _, b)) in before.iter().zip(after.iter()) {
            assert_eq!(a, b);
        }
        assert_eq!(solver.storage().num_info_sets(), tree.num_info_sets());
    }

    #[test]
    fn test_three_player_sweep_values_match_evaluation() {
        use crate::games::leduc::{leduc_eval, leduc_format};
        use crate::tree::{GameRules, RoundInfo};

        let rules = GameRules {
            players: 3,
            deck: ["As", "Ah", "Ks", "Kh", "Qs"]
                .iter()
                .map(|s| s.parse().unwrap())
                .collect(),
            rounds: vec![
                RoundInfo::new(1, 0, 1, vec![1, 1, 1]),
                RoundInfo::new(0, 1, 2, vec![1, 1, 1]),
            ],
            ante: 1,
            blinds: None,
            hand_eval: leduc_eval,
            infoset_format: leduc_format,
        };
        let tree = PublicTree::build(&rules).unwrap();
        let size = tree.range_size();

        // The first sweep plays uniform, which is the default profile.
        let mut storage = RegretStorage::with_capacity(3, tree.num_info_sets());
        let mut current = StrategyProfile::new(tree.registry().clone());
        let mut sweep = Sweep {
            storage: &mut storage,
            current: &mut current,
            iteration: 0,
            players: 3,
            size,
        };
        let values = sweep.cfr(tree.root(), &initial_reach(&tree), 1.0);

        let uniform = StrategyProfile::new(tree.registry().clone());
        let expected = evaluation::expected_values(&tree, &uniform);
        for player in 0..3 {
            let got: f64 = row(&values, player, size).iter().sum();
            assert!(
                (got - expected[player]).abs() < 1e-9,
                "player {}: sweep {} vs evaluation {}",
                player,
                got,
                expected[player]
            );
        }

        let mut solver = CFRSolver::new(&tree, CFRConfig::default()).unwrap();
        let profile = solver.train(50);
        for (_, _, probs) in profile.iter() {
            assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let tree = PublicTree::build(&kuhn::kuhn_rules()).unwrap();
        let config = CFRConfig::default().with_log_interval(0);
        assert!(matches!(
            CFRSolver::new(&tree, config),
            Err(SolverError::Config(_))
        ));
    }
}
