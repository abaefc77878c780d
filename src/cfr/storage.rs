//! Storage for CFR regrets and strategy sums.
//!
//! Both tables are flat `Vec<f64>` buffers indexed by
//! `(info set id, player, action)`, sized once from the information-set
//! registry of the tree being solved.

use crate::tree::{Action, InfoSetId, LegalActions};

const NUM_ACTIONS: usize = Action::ALL.len();

/// Cumulative regrets and reach-weighted strategy sums.
///
/// - **Regrets**: counterfactual regret of each action, summed over
///   iterations.
/// - **Strategy sums**: current strategy weighted by the acting player's
///   own reach, summed over iterations. Normalized, this is the average
///   strategy that converges to equilibrium.
#[derive(Debug, Clone, Default)]
pub struct RegretStorage {
    players: usize,
    regrets: Vec<f64>,
    strategy_sums: Vec<f64>,
}

impl RegretStorage {
    /// Create empty storage for a game with `players` players.
    pub fn new(players: usize) -> Self {
        Self {
            players,
            regrets: Vec::new(),
            strategy_sums: Vec::new(),
        }
    }

    /// Create storage with room for `num_info_sets` information sets.
    pub fn with_capacity(players: usize, num_info_sets: usize) -> Self {
        let mut storage = Self::new(players);
        storage.ensure_info_sets(num_info_sets);
        storage
    }

    /// Grow the tables to cover `num_info_sets` ids. Never shrinks.
    pub fn ensure_info_sets(&mut self, num_info_sets: usize) {
        let len = num_info_sets * self.players * NUM_ACTIONS;
        if len > self.regrets.len() {
            self.regrets.resize(len, 0.0);
            self.strategy_sums.resize(len, 0.0);
        }
    }

    #[inline]
    fn offset(&self, id: InfoSetId, player: usize) -> usize {
        (id.index() * self.players + player) * NUM_ACTIONS
    }

    /// Regret matching: probabilities proportional to positive regret,
    /// uniform over the legal actions when no regret is positive.
    pub fn regret_matching(&self, id: InfoSetId, player: usize, legal: LegalActions) -> [f64; 3] {
        let offset = self.offset(id, player);
        let mut positive = [0.0; 3];
        for action in legal.iter() {
            positive[action.index()] = self.regrets[offset + action.index()].max(0.0);
        }

        let sum: f64 = positive.iter().sum();
        if sum > 0.0 {
            positive.map(|r| r / sum)
        } else {
            legal.uniform()
        }
    }

    /// Add `delta` to the regret of `action`.
    #[inline]
    pub fn add_regret(&mut self, id: InfoSetId, player: usize, action: Action, delta: f64) {
        let offset = self.offset(id, player);
        self.regrets[offset + action.index()] += delta;
    }

    /// Add `strategy` weighted by `weight` to the strategy sum.
    #[inline]
    pub fn update_strategy_sum(
        &mut self,
        id: InfoSetId,
        player: usize,
        strategy: &[f64; 3],
        weight: f64,
    ) {
        let offset = self.offset(id, player);
        for (sum, &prob) in self.strategy_sums[offset..offset + NUM_ACTIONS]
            .iter_mut()
            .zip(strategy)
        {
            *sum += prob * weight;
        }
    }

    /// Normalized strategy sum, uniform over the legal actions if the
    /// information set was never reached.
    pub fn average_strategy(&self, id: InfoSetId, player: usize, legal: LegalActions) -> [f64; 3] {
        let offset = self.offset(id, player);
        let mut sums = [0.0; 3];
        for action in legal.iter() {
            sums[action.index()] = self.strategy_sums[offset + action.index()];
        }

        let total: f64 = sums.iter().sum();
        if total > 0.0 {
            sums.map(|s| s / total)
        } else {
            legal.uniform()
        }
    }

    /// Accumulated regret of `action`.
    pub fn regret(&self, id: InfoSetId, player: usize, action: Action) -> f64 {
        self.regrets[self.offset(id, player) + action.index()]
    }

    /// Number of information sets the tables cover.
    pub fn num_info_sets(&self) -> usize {
        if self.players == 0 {
            return 0;
        }
        self.regrets.len() / (self.players * NUM_ACTIONS)
    }

    /// Zero both tables, keeping their size.
    pub fn clear(&mut self) {
        self.regrets.iter_mut().for_each(|r| *r = 0.0);
        self.strategy_sums.iter_mut().for_each(|s| *s = 0.0);
    }

    /// Estimate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        (self.regrets.capacity() + self.strategy_sums.capacity()) * std::mem::size_of::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regret_matching_uses_positive_regret() {
        let mut storage = RegretStorage::with_capacity(2, 1);
        let id = InfoSetId(0);
        let legal = LegalActions::all();

        storage.add_regret(id, 1, Action::Fold, -3.0);
        storage.add_regret(id, 1, Action::Call, 1.0);
        storage.add_regret(id, 1, Action::Raise, 3.0);
        assert_eq!(storage.regret_matching(id, 1, legal), [0.0, 0.25, 0.75]);

        // Player 0's slot is untouched.
        assert_eq!(storage.regret_matching(id, 0, legal), legal.uniform());
    }

    #[test]
    fn test_uniform_fallback_over_legal_actions() {
        let mut storage = RegretStorage::with_capacity(2, 1);
        let id = InfoSetId(0);
        let legal = LegalActions::new(false, true, true);

        storage.add_regret(id, 0, Action::Call, -1.0);
        storage.add_regret(id, 0, Action::Raise, -2.0);
        assert_eq!(storage.regret_matching(id, 0, legal), [0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_average_strategy_normalizes_sums() {
        let mut storage = RegretStorage::with_capacity(2, 2);
        let id = InfoSetId(1);
        let legal = LegalActions::new(true, true, false);
        assert_eq!(storage.average_strategy(id, 0, legal), [0.5, 0.5, 0.0]);

        storage.update_strategy_sum(id, 0, &[1.0, 0.0, 0.0], 0.5);
        storage.update_strategy_sum(id, 0, &[0.0, 1.0, 0.0], 1.5);
        assert_eq!(storage.average_strategy(id, 0, legal), [0.25, 0.75, 0.0]);
    }

    #[test]
    fn test_growth_and_clear() {
        let mut storage = RegretStorage::new(3);
        assert_eq!(storage.num_info_sets(), 0);
        storage.ensure_info_sets(4);
        assert_eq!(storage.num_info_sets(), 4);
        storage.ensure_info_sets(2);
        assert_eq!(storage.num_info_sets(), 4);
        assert!(storage.memory_usage() >= 2 * 4 * 3 * 3 * std::mem::size_of::<f64>());

        storage.add_regret(InfoSetId(3), 2, Action::Raise, 1.0);
        assert_eq!(storage.regret(InfoSetId(3), 2, Action::Raise), 1.0);
        storage.clear();
        assert_eq!(storage.regret(InfoSetId(3), 2, Action::Raise), 0.0);
        assert_eq!(storage.num_info_sets(), 4);
    }
}
