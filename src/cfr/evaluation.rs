//! Expected value and exploitability of strategy profiles.
//!
//! Both measures run the same vector-form traversal as the solver, with
//! reach rows pushed down and per-hand value rows returned, but read the
//! strategy from a fixed [`StrategyProfile`] instead of the regret table.

use crate::cfr::policy::StrategyProfile;
use crate::cfr::sliceop::{add_slice, max_slice, mul_slice_scalar, row, row_mut};
use crate::tree::{ActionNode, ChanceNode, Node, PublicTree, TerminalNode};

/// Per-player expected value of `profile`, in chips per hand.
pub fn expected_values(tree: &PublicTree, profile: &StrategyProfile) -> Vec<f64> {
    let size = tree.range_size();
    let mut evaluator = Evaluator {
        profile,
        players: tree.players(),
        size,
        best_responder: None,
    };
    let values = evaluator.evaluate(tree.root(), &initial_reach(tree), 1.0);
    (0..tree.players())
        .map(|p| row(&values, p, size).iter().sum())
        .collect()
}

/// Per-player value of a best response against the other players'
/// strategies in `profile`.
///
/// The responder picks the best action separately for every holding at
/// every node, which is a best response in the game with full card
/// information even when the information-set keys merge holdings.
pub fn best_response_values(tree: &PublicTree, profile: &StrategyProfile) -> Vec<f64> {
    let size = tree.range_size();
    let reach = initial_reach(tree);
    (0..tree.players())
        .map(|player| {
            let mut evaluator = Evaluator {
                profile,
                players: tree.players(),
                size,
                best_responder: Some(player),
            };
            let values = evaluator.evaluate(tree.root(), &reach, 1.0);
            row(&values, player, size).iter().sum()
        })
        .collect()
}

/// Mean over players of the best-response value against `profile`.
///
/// For two-player zero-sum games this is non-negative and zero exactly at
/// a Nash equilibrium.
pub fn exploitability(tree: &PublicTree, profile: &StrategyProfile) -> f64 {
    let values = best_response_values(tree, profile);
    values.iter().sum::<f64>() / values.len() as f64
}

/// Reach rows at the root: one for every dealable holding.
pub(crate) fn initial_reach(tree: &PublicTree) -> Vec<f64> {
    let allowed: Vec<f64> = tree
        .allowed_hands()
        .iter()
        .map(|&a| if a { 1.0 } else { 0.0 })
        .collect();
    allowed.repeat(tree.players())
}

/// Counterfactual value rows at a terminal.
///
/// Each payoff entry contributes its payoff weighted by the opponents'
/// reach to the row of every player; each row entry is then averaged over
/// the entries sharing that holding and scaled by `chance`, the product of
/// `1 / deal_count` over the chance nodes above. Reach rows carry only the
/// players' own action probabilities, so the weight of an entry is its
/// joint deal probability for any number of players.
pub(crate) fn terminal_values(
    node: &TerminalNode,
    reach: &[f64],
    size: usize,
    chance: f64,
) -> Vec<f64> {
    let players = node.committed.len();
    let mut values = vec![0.0; players * size];

    for entry in &node.payoffs.entries {
        for player in 0..players {
            let mut prob = 1.0;
            for (opp, &hand) in entry.hands.iter().enumerate() {
                if opp != player {
                    prob *= reach[opp * size + hand];
                }
            }
            values[player * size + entry.hands[player]] += prob * entry.payoffs[player];
        }
    }

    for (player, holdings) in node.info.holecards.iter().enumerate() {
        for (pos, &hand) in holdings.iter().enumerate() {
            let count = node.payoffs.counts[player][pos];
            assert!(
                count > 0,
                "terminal {} has no payoff entry for player {} holding {}",
                node.info.bet_history,
                player,
                hand
            );
            values[player * size + hand] /= count as f64;
        }
    }

    mul_slice_scalar(&mut values, chance);
    values
}

struct Evaluator<'a> {
    profile: &'a StrategyProfile,
    players: usize,
    size: usize,
    best_responder: Option<usize>,
}

impl Evaluator<'_> {
    fn evaluate(&mut self, node: &Node, reach: &[f64], chance: f64) -> Vec<f64> {
        match node {
            Node::Terminal(terminal) => terminal_values(terminal, reach, self.size, chance),
            Node::HolecardChance(deal) | Node::BoardcardChance(deal) => {
                self.chance(deal, reach, chance)
            }
            Node::Action(action) if self.best_responder == Some(action.player) => {
                self.best_response(action, reach, chance)
            }
            Node::Action(action) => self.follow_profile(action, reach, chance),
        }
    }

    fn chance(&mut self, node: &ChanceNode, reach: &[f64], chance: f64) -> Vec<f64> {
        let chance = chance / node.deal_count;
        let mut values = vec![0.0; reach.len()];
        for child in &node.children {
            add_slice(&mut values, &self.evaluate(child, reach, chance));
        }
        values
    }

    fn follow_profile(&mut self, node: &ActionNode, reach: &[f64], chance: f64) -> Vec<f64> {
        let player = node.player;
        let holdings = &node.info.holecards[player];
        let strategies: Vec<[f64; 3]> = node
            .infosets
            .iter()
            .map(|&id| self.profile.probs_by_id(id))
            .collect();

        let mut values = vec![0.0; reach.len()];
        for (action, child) in node.children() {
            let mut next = reach.to_vec();
            for (strategy, &hand) in strategies.iter().zip(holdings) {
                next[player * self.size + hand] *= strategy[action.index()];
            }

            let child_values = self.evaluate(child, &next, chance);
            for p in (0..self.players).filter(|&p| p != player) {
                add_slice(
                    row_mut(&mut values, p, self.size),
                    row(&child_values, p, self.size),
                );
            }
            for (strategy, &hand) in strategies.iter().zip(holdings) {
                let i = player * self.size + hand;
                values[i] += strategy[action.index()] * child_values[i];
            }
        }
        values
    }

    fn best_response(&mut self, node: &ActionNode, reach: &[f64], chance: f64) -> Vec<f64> {
        let player = node.player;
        let mut values = vec![0.0; reach.len()];
        let mut best: Option<Vec<f64>> = None;

        for (_, child) in node.children() {
            let child_values = self.evaluate(child, reach, chance);
            for p in (0..self.players).filter(|&p| p != player) {
                add_slice(
                    row_mut(&mut values, p, self.size),
                    row(&child_values, p, self.size),
                );
            }
            let own = row(&child_values, player, self.size);
            match best.as_mut() {
                Some(best) => max_slice(best, own),
                None => best = Some(own.to_vec()),
            }
        }

        if let Some(best) = best {
            row_mut(&mut values, player, self.size).copy_from_slice(&best);
        }
        values
    }
}
