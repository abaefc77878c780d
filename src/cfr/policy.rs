//! Strategy profiles.
//!
//! A [`StrategyProfile`] maps every registered information set to a
//! distribution over fold/call/raise. The solver keeps one as its current
//! profile, rewritten at every visit, and produces the average profile
//! from its strategy sums when training returns.

use std::sync::Arc;

use rand::Rng;

use crate::tree::{Action, InfoSetId, InfoSetRegistry, LegalActions};

/// Action probabilities for every information set of a tree.
#[derive(Debug, Clone)]
pub struct StrategyProfile {
    registry: Arc<InfoSetRegistry>,
    policy: Vec<Option<[f64; 3]>>,
}

impl StrategyProfile {
    /// Profile with no explicit entries: every information set plays
    /// uniformly over its legal actions.
    pub fn new(registry: Arc<InfoSetRegistry>) -> Self {
        let policy = vec![None; registry.len()];
        Self { registry, policy }
    }

    pub fn registry(&self) -> &InfoSetRegistry {
        &self.registry
    }

    /// Probabilities at `id`, uniform over legal actions when unset.
    #[inline]
    pub fn probs_by_id(&self, id: InfoSetId) -> [f64; 3] {
        match self.policy.get(id.index()).copied().flatten() {
            Some(probs) => probs,
            None => self.registry.get(id).legal.uniform(),
        }
    }

    /// Probabilities of `player` at the information set `key`.
    ///
    /// Keys the tree never registered get uniform over all three actions.
    pub fn probs(&self, player: usize, key: &str) -> [f64; 3] {
        match self.registry.lookup(player, key) {
            Some(id) => self.probs_by_id(id),
            None => LegalActions::all().uniform(),
        }
    }

    #[inline]
    pub fn set(&mut self, id: InfoSetId, probs: [f64; 3]) {
        self.policy[id.index()] = Some(probs);
    }

    /// True if `id` has an explicit entry.
    pub fn contains(&self, id: InfoSetId) -> bool {
        self.policy.get(id.index()).map_or(false, Option::is_some)
    }

    /// Draw an action for `player` at `key`.
    pub fn sample_action<R: Rng>(&self, player: usize, key: &str, rng: &mut R) -> Action {
        let probs = self.probs(player, key);
        let r: f64 = rng.gen();
        let mut cumsum = 0.0;

        for action in Action::ALL {
            cumsum += probs[action.index()];
            if r < cumsum {
                return action;
            }
        }

        // Floating point shortfall: last action with positive probability.
        Action::ALL
            .into_iter()
            .rev()
            .find(|a| probs[a.index()] > 0.0)
            .unwrap_or(Action::Call)
    }

    /// Number of information sets covered.
    pub fn len(&self) -> usize {
        self.policy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policy.is_empty()
    }

    /// `(player, key, probabilities)` for every information set, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, [f64; 3])> + '_ {
        self.registry
            .iter()
            .map(move |(id, set)| (set.player, set.key.as_str(), self.probs_by_id(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn registry() -> Arc<InfoSetRegistry> {
        let mut registry = InfoSetRegistry::new(2);
        registry.register(0, "K:/:".to_string(), LegalActions::new(false, true, true));
        registry.register(1, "K:/r:".to_string(), LegalActions::new(true, true, false));
        Arc::new(registry)
    }

    #[test]
    fn test_defaults() {
        let profile = StrategyProfile::new(registry());
        assert_eq!(profile.len(), 2);
        assert_eq!(profile.probs(0, "K:/:"), [0.0, 0.5, 0.5]);
        assert_eq!(profile.probs(1, "K:/r:"), [0.5, 0.5, 0.0]);

        let unknown = profile.probs(0, "A:/:");
        assert!(unknown.iter().all(|&p| (p - 1.0 / 3.0).abs() < 1e-12));
        // Same key, other player.
        assert!(profile.probs(1, "K:/:").iter().all(|&p| p > 0.0));
    }

    #[test]
    fn test_set_overrides_default() {
        let mut profile = StrategyProfile::new(registry());
        let id = profile.registry().lookup(1, "K:/r:").unwrap();
        assert!(!profile.contains(id));
        profile.set(id, [0.2, 0.8, 0.0]);
        assert!(profile.contains(id));
        assert_eq!(profile.probs(1, "K:/r:"), [0.2, 0.8, 0.0]);

        let entries: Vec<_> = profile.iter().collect();
        assert_eq!(entries[1], (1, "K:/r:", [0.2, 0.8, 0.0]));
    }

    #[test]
    fn test_sample_action_follows_probs() {
        let mut profile = StrategyProfile::new(registry());
        let id = profile.registry().lookup(0, "K:/:").unwrap();
        profile.set(id, [0.0, 0.25, 0.75]);

        let mut rng = StdRng::seed_from_u64(42);
        let mut raises = 0;
        for _ in 0..10_000 {
            match profile.sample_action(0, "K:/:", &mut rng) {
                Action::Raise => raises += 1,
                Action::Call => {}
                Action::Fold => panic!("fold has zero probability"),
            }
        }
        let freq = raises as f64 / 10_000.0;
        assert!((freq - 0.75).abs() < 0.03, "raise frequency {}", freq);
    }
}
