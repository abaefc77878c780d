//! Top-down tree construction.
//!
//! The builder walks the round descriptors of a [`GameRules`] value and
//! expands dealing and betting into [`Node`]s. Two dealing modes share the
//! betting logic:
//!
//! - [`DealMode::Public`]: one hole-card child holding every deck
//!   combination for every player. Board children filter out holdings that
//!   collide with the new board cards. This is the tree the solver runs on.
//! - [`DealMode::PerDeal`]: one hole-card child per ordered deal, each
//!   player holding exactly one combination. Dealt cards leave the deck.

use log::{debug, info};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::cards::{cards_mask, cards_to_string, range_cards, range_index, Card};
use crate::error::SolverError;
use crate::tree::infoset::InfoSetRegistry;
use crate::tree::node::{
    Action, ActionNode, ChanceNode, LegalActions, Node, NodeInfo, PayoffEntry, PayoffTable,
    TerminalNode,
};
use crate::tree::rules::GameRules;

/// How private cards are dealt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealMode {
    Public,
    PerDeal,
}

/// Betting and dealing state threaded down one branch.
#[derive(Debug, Clone)]
struct BuildState {
    round: usize,
    board: Vec<Card>,
    /// Cards still undealt.
    deck: Vec<Card>,
    holecards: Vec<Vec<usize>>,
    bet_history: String,
    committed: Vec<u32>,
    /// Bet level of each player in the current round.
    bets: Vec<u32>,
    players_in: Vec<bool>,
    next_player: usize,
    min_actions: usize,
    actions: usize,
}

impl BuildState {
    fn info(&self) -> NodeInfo {
        NodeInfo {
            board: self.board.clone(),
            bet_history: self.bet_history.clone(),
            holecards: self.holecards.clone(),
        }
    }

    fn players_remaining(&self) -> usize {
        self.players_in.iter().filter(|&&p| p).count()
    }

    /// First seat after `player` that has not folded.
    fn next_in_after(&self, player: usize) -> usize {
        let n = self.players_in.len();
        (1..=n)
            .map(|i| (player + i) % n)
            .find(|&seat| self.players_in[seat])
            .unwrap_or(player)
    }

    fn max_bet(&self) -> u32 {
        self.bets.iter().copied().max().unwrap_or(0)
    }

    fn max_committed(&self) -> u32 {
        self.committed.iter().copied().max().unwrap_or(0)
    }

    fn round_closed(&self) -> bool {
        let max_bet = self.max_bet();
        self.actions >= self.min_actions
            && self
                .bets
                .iter()
                .zip(&self.players_in)
                .all(|(&bet, &is_in)| !is_in || bet == max_bet)
    }
}

/// Expands a [`GameRules`] value into a tree and its information sets.
pub struct TreeBuilder<'r> {
    rules: &'r GameRules,
    mode: DealMode,
    holecard_count: usize,
    registry: InfoSetRegistry,
    nodes: usize,
}

impl<'r> TreeBuilder<'r> {
    /// Validate `rules` and prepare a builder.
    pub fn new(rules: &'r GameRules, mode: DealMode) -> Result<Self, SolverError> {
        rules.validate()?;
        Ok(Self {
            rules,
            mode,
            holecard_count: rules.holecard_count(),
            registry: InfoSetRegistry::new(rules.players),
            nodes: 0,
        })
    }

    /// Build the whole tree.
    pub fn build(mut self) -> Result<(Node, InfoSetRegistry), SolverError> {
        let (committed, bets, next_player) = self.rules.forced_bets();
        let players = self.rules.players;
        let state = BuildState {
            round: 0,
            board: Vec::new(),
            deck: self.rules.deck.clone(),
            holecards: vec![Vec::new(); players],
            bet_history: String::new(),
            committed,
            bets,
            players_in: vec![true; players],
            next_player,
            min_actions: 0,
            actions: 0,
        };

        let root = self.build_round(state)?;
        info!(
            "built {:?} tree: {} nodes, {} information sets",
            self.mode,
            self.nodes,
            self.registry.len()
        );
        Ok((root, self.registry))
    }

    fn build_round(&mut self, mut state: BuildState) -> Result<Node, SolverError> {
        if state.round == self.rules.rounds.len() {
            return self.build_terminal(state);
        }

        let rules = self.rules;
        let round = &rules.rounds[state.round];
        let parent_history = state.bet_history.clone();
        state.bet_history.push('/');
        if state.round > 0 {
            state.bets = vec![0; self.rules.players];
            state.next_player = state.next_in_after(self.rules.players - 1);
        }
        state.min_actions = state.players_remaining();
        state.actions = 0;

        if round.holecard_count > 0 {
            self.build_holecards(state, parent_history)
        } else if round.boardcard_count > 0 {
            self.build_boardcards(state)
        } else {
            self.build_bets(state)
        }
    }

    /// After hole cards are dealt the same round may still deal a board.
    fn after_holecards(&mut self, state: BuildState) -> Result<Node, SolverError> {
        if self.rules.rounds[state.round].boardcard_count > 0 {
            self.build_boardcards(state)
        } else {
            self.build_bets(state)
        }
    }

    fn build_holecards(&mut self, state: BuildState, history: String) -> Result<Node, SolverError> {
        self.nodes += 1;
        let k = self.rules.rounds[state.round].holecard_count;
        let deal_count = choose(state.deck.len(), k);
        let info = NodeInfo {
            bet_history: history,
            ..state.info()
        };

        let children = match self.mode {
            DealMode::Public => {
                let holdings: Vec<usize> = combinations(&state.deck, k)
                    .iter()
                    .map(|combo| range_index(combo))
                    .collect();
                let mut dealt = state;
                dealt.holecards = vec![holdings; self.rules.players];
                vec![self.after_holecards(dealt)?]
            }
            DealMode::PerDeal => {
                let mut deals = Vec::new();
                deal_per_player(&state, k, 0, &mut deals);
                deals
                    .into_iter()
                    .map(|dealt| self.after_holecards(dealt))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(Node::HolecardChance(ChanceNode {
            info,
            to_deal: k,
            deal_count: deal_count as f64,
            children,
        }))
    }

    fn build_boardcards(&mut self, state: BuildState) -> Result<Node, SolverError> {
        self.nodes += 1;
        let m = self.rules.rounds[state.round].boardcard_count;
        let unseen = match self.mode {
            DealMode::Public => state.deck.len().saturating_sub(self.holecard_count),
            DealMode::PerDeal => state.deck.len(),
        };
        let deal_count = choose(unseen, m);
        if m > state.deck.len() || deal_count == 0 {
            return Err(SolverError::DealExceedsDeck {
                round: state.round,
                requested: m,
                remaining: unseen,
            });
        }

        let mut children = Vec::new();
        for combo in combinations(&state.deck, m) {
            let combo_mask = cards_mask(&combo);
            let mut dealt = state.clone();
            dealt.board.extend_from_slice(&combo);
            dealt.deck.retain(|card| card.mask() & combo_mask == 0);
            for holdings in dealt.holecards.iter_mut() {
                holdings.retain(|&h| {
                    cards_mask(range_cards(self.holecard_count, h)) & combo_mask == 0
                });
            }
            children.push(self.build_bets(dealt)?);
        }

        Ok(Node::BoardcardChance(ChanceNode {
            info: state.info(),
            to_deal: m,
            deal_count: deal_count as f64,
            children,
        }))
    }

    fn build_bets(&mut self, mut state: BuildState) -> Result<Node, SolverError> {
        if state.players_remaining() == 1 {
            return self.build_terminal(state);
        }
        if state.round_closed() {
            state.round += 1;
            return self.build_round(state);
        }

        self.nodes += 1;
        let rules = self.rules;
        let round = &rules.rounds[state.round];
        let player = state.next_player;
        let max_bet = state.max_bet();
        let max_committed = state.max_committed();
        let legal = LegalActions::new(
            state.committed[player] < max_committed,
            true,
            round.max_bets[player] > max_bet,
        );

        let infosets: Vec<_> = state.holecards[player]
            .iter()
            .map(|&h| {
                let key = (rules.infoset_format)(
                    player,
                    range_cards(self.holecard_count, h),
                    &state.board,
                    &state.bet_history,
                );
                self.registry.register(player, key, legal)
            })
            .collect();

        let next_player = state.next_in_after(player);
        let mut actions: [Option<Box<Node>>; 3] = [None, None, None];
        for action in legal.iter() {
            let mut next = state.clone();
            match action {
                Action::Fold => {
                    next.players_in[player] = false;
                }
                Action::Call => {
                    next.committed[player] = max_committed;
                    next.bets[player] = max_bet;
                }
                Action::Raise => {
                    next.bets[player] = max_bet + 1;
                    next.committed[player] = max_committed + round.bet_size;
                }
            }
            next.bet_history.push(action.token());
            next.actions += 1;
            next.next_player = next_player;
            actions[action.index()] = Some(Box::new(self.build_bets(next)?));
        }

        Ok(Node::Action(ActionNode {
            info: state.info(),
            player,
            actions,
            infosets,
            legal,
        }))
    }

    fn build_terminal(&mut self, state: BuildState) -> Result<Node, SolverError> {
        self.nodes += 1;
        let k = self.holecard_count;

        let mut tuples: Vec<(Vec<usize>, u64)> = vec![(Vec::new(), 0)];
        for holdings in &state.holecards {
            let mut extended = Vec::with_capacity(tuples.len() * holdings.len());
            for (hands, used) in &tuples {
                for &h in holdings {
                    let mask = cards_mask(range_cards(k, h));
                    if mask & used == 0 {
                        let mut hands = hands.clone();
                        hands.push(h);
                        extended.push((hands, used | mask));
                    }
                }
            }
            tuples = extended;
        }

        let pot: u32 = state.committed.iter().sum();
        let rules = self.rules;
        let board = &state.board;
        let committed = &state.committed;
        let players_in = &state.players_in;
        let fold = state.players_remaining() == 1;

        let entries: Vec<PayoffEntry> = tuples
            .into_par_iter()
            .map(|(hands, _)| {
                let winners: Vec<usize> = if fold {
                    players_in.iter().position(|&p| p).into_iter().collect()
                } else {
                    let scores: Vec<Option<u32>> = hands
                        .iter()
                        .enumerate()
                        .map(|(p, &h)| {
                            players_in[p].then(|| (rules.hand_eval)(range_cards(k, h), board))
                        })
                        .collect();
                    let best = scores.iter().flatten().copied().max();
                    (0..hands.len())
                        .filter(|&p| scores[p].is_some() && scores[p] == best)
                        .collect()
                };

                let share = pot as f64 / winners.len() as f64;
                let mut payoffs: Vec<f64> = committed.iter().map(|&c| -(c as f64)).collect();
                for &w in &winners {
                    payoffs[w] += share;
                }
                PayoffEntry { hands, payoffs }
            })
            .collect();

        let mut counts = Vec::with_capacity(state.holecards.len());
        for (player, holdings) in state.holecards.iter().enumerate() {
            let mut tally: FxHashMap<usize, u32> = FxHashMap::default();
            for entry in &entries {
                *tally.entry(entry.hands[player]).or_insert(0) += 1;
            }
            let mut player_counts = Vec::with_capacity(holdings.len());
            for &h in holdings {
                let count = tally.get(&h).copied().unwrap_or(0);
                if count == 0 {
                    return Err(SolverError::MissingPayoff {
                        history: state.bet_history.clone(),
                        player,
                        holding: cards_to_string(range_cards(k, h)),
                    });
                }
                player_counts.push(count);
            }
            counts.push(player_counts);
        }

        if entries.len() > 10_000 {
            debug!(
                "terminal {} has {} payoff entries",
                state.bet_history,
                entries.len()
            );
        }

        Ok(Node::Terminal(TerminalNode {
            info: state.info(),
            committed: state.committed,
            players_in: state.players_in,
            payoffs: PayoffTable { entries, counts },
        }))
    }
}

/// Every ordered assignment of distinct `k`-card holdings to the players
/// from `player` on.
fn deal_per_player(state: &BuildState, k: usize, player: usize, out: &mut Vec<BuildState>) {
    if player == state.holecards.len() {
        out.push(state.clone());
        return;
    }
    for combo in combinations(&state.deck, k) {
        let combo_mask = cards_mask(&combo);
        let mut dealt = state.clone();
        dealt.holecards[player] = vec![range_index(&combo)];
        dealt.deck.retain(|card| card.mask() & combo_mask == 0);
        deal_per_player(&dealt, k, player + 1, out);
    }
}

/// All `k`-subsets of `cards`, in lexicographic order of position.
pub(crate) fn combinations(cards: &[Card], k: usize) -> Vec<Vec<Card>> {
    fn extend(
        cards: &[Card],
        k: usize,
        start: usize,
        current: &mut Vec<Card>,
        out: &mut Vec<Vec<Card>>,
    ) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..cards.len() {
            current.push(cards[i]);
            extend(cards, k, i + 1, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    if k <= cards.len() {
        extend(cards, k, 0, &mut Vec::with_capacity(k), &mut out);
    }
    out
}

/// Binomial coefficient C(n, k).
pub(crate) fn choose(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1u64, |acc, i| acc * (n - i) as u64 / (i + 1) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::rules::RoundInfo;

    fn deck(cards: &[&str]) -> Vec<Card> {
        cards.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn high_card(hole: &[Card], _board: &[Card]) -> u32 {
        hole[0].rank() as u32
    }

    fn rank_format(_player: usize, hole: &[Card], board: &[Card], history: &str) -> String {
        format!("{}{}:{}", cards_to_string(hole), cards_to_string(board), history)
    }

    fn three_player_rules() -> GameRules {
        GameRules {
            players: 3,
            deck: deck(&["As", "Ks", "Qs", "Js"]),
            rounds: vec![RoundInfo::new(1, 0, 1, vec![1, 1, 1])],
            ante: 1,
            blinds: None,
            hand_eval: high_card,
            infoset_format: rank_format,
        }
    }

    #[test]
    fn test_choose() {
        assert_eq!(choose(3, 1), 3);
        assert_eq!(choose(6, 2), 15);
        assert_eq!(choose(52, 2), 1326);
        assert_eq!(choose(4, 0), 1);
        assert_eq!(choose(2, 3), 0);
    }

    #[test]
    fn test_combinations_order() {
        let cards = deck(&["As", "Kh", "Ks"]);
        let combos = combinations(&cards, 2);
        assert_eq!(combos.len(), 3);
        assert_eq!(combos[0], vec![cards[0], cards[1]]);
        assert_eq!(combos[2], vec![cards[1], cards[2]]);
        assert!(combinations(&cards, 4).is_empty());
    }

    #[test]
    fn test_three_player_round_closes_after_everyone_acts() {
        let rules = three_player_rules();
        let (root, registry) = TreeBuilder::new(&rules, DealMode::Public).unwrap().build().unwrap();
        let first = root.child(0).unwrap();

        // Two checks do not close the round for three players.
        let cc = first.child(0).unwrap().child(0).unwrap();
        assert_eq!(cc.bet_history(), "/cc");
        assert_eq!(cc.as_action().unwrap().player, 2);

        let ccc = cc.child(0).unwrap();
        assert!(!ccc.as_terminal().unwrap().is_fold());

        // After a fold the betting skips the folded seat.
        let r = first.child(1).unwrap();
        let rf = r.child(0).unwrap();
        assert_eq!(rf.bet_history(), "/rf");
        assert_eq!(rf.as_action().unwrap().player, 2);
        let rff = rf.child(0).unwrap().as_terminal().unwrap();
        assert!(rff.is_fold());
        for entry in &rff.payoffs.entries {
            assert_eq!(entry.payoffs, vec![2.0, -1.0, -1.0]);
        }

        assert!(registry.lookup(2, "As:/cc").is_some());
    }

    #[test]
    fn test_showdown_split_pot() {
        let rules = GameRules {
            players: 2,
            deck: deck(&["As", "Ah", "Ks"]),
            rounds: vec![RoundInfo::new(1, 0, 1, vec![0, 0])],
            ante: 1,
            blinds: None,
            hand_eval: high_card,
            infoset_format: rank_format,
        };
        let (root, _) = TreeBuilder::new(&rules, DealMode::Public).unwrap().build().unwrap();
        let terminal = root.child(0).unwrap().child(0).unwrap().child(0).unwrap();
        let terminal = terminal.as_terminal().unwrap();
        assert_eq!(terminal.info.bet_history, "/cc");

        let as_ = range_index(&deck(&["As"]));
        let ah = range_index(&deck(&["Ah"]));
        let ks = range_index(&deck(&["Ks"]));
        for entry in &terminal.payoffs.entries {
            let expected = match (entry.hands[0], entry.hands[1]) {
                (a, b) if a == as_ && b == ah || a == ah && b == as_ => vec![0.0, 0.0],
                (k, _) if k == ks => vec![-1.0, 1.0],
                _ => vec![1.0, -1.0],
            };
            assert_eq!(entry.payoffs, expected);
        }
        assert_eq!(terminal.payoffs.entries.len(), 6);
        assert!(terminal.payoffs.counts.iter().flatten().all(|&c| c == 2));
    }

    #[test]
    fn test_board_deal_filters_holdings() {
        let rules = GameRules {
            players: 2,
            deck: deck(&["As", "Ks", "Qs"]),
            rounds: vec![
                RoundInfo::new(1, 0, 1, vec![0, 0]),
                RoundInfo::new(0, 1, 1, vec![0, 0]),
            ],
            ante: 1,
            blinds: None,
            hand_eval: high_card,
            infoset_format: rank_format,
        };
        let (root, _) = TreeBuilder::new(&rules, DealMode::Public).unwrap().build().unwrap();
        let board = root.child(0).unwrap().child(0).unwrap().child(0).unwrap();
        let Node::BoardcardChance(chance) = board else {
            panic!("expected a board deal at /cc/");
        };
        assert_eq!(chance.info.bet_history, "/cc/");
        assert_eq!(chance.children.len(), 3);
        assert_eq!(chance.deal_count, 2.0);
        for child in &chance.children {
            let dealt = child.board()[0];
            for holdings in &child.info().holecards {
                assert_eq!(holdings.len(), 2);
                assert!(!holdings.contains(&dealt.index()));
            }
        }
    }

    #[test]
    fn test_terminal_without_disjoint_tuple_is_rejected() {
        let rules = three_player_rules();
        let mut builder = TreeBuilder::new(&rules, DealMode::Public).unwrap();
        let ace = range_index(&deck(&["As"]));
        let king = range_index(&deck(&["Ks"]));

        // Player 1 may only hold the ace, so player 0's ace meets no opponent.
        let state = BuildState {
            round: 1,
            board: Vec::new(),
            deck: rules.deck.clone(),
            holecards: vec![vec![ace, king], vec![ace], vec![range_index(&deck(&["Qs"]))]],
            bet_history: "/ccc".to_string(),
            committed: vec![1, 1, 1],
            bets: vec![0, 0, 0],
            players_in: vec![true, true, true],
            next_player: 0,
            min_actions: 3,
            actions: 3,
        };

        match builder.build_terminal(state) {
            Err(SolverError::MissingPayoff { history, player, holding }) => {
                assert_eq!(history, "/ccc");
                assert_eq!(player, 0);
                assert_eq!(holding, "As");
            }
            other => panic!("expected a missing payoff, got {:?}", other.map(|_| ())),
        }
    }
}
