//! Node types of the game trees.
//!
//! The node set is closed: every traversal in the crate matches on [`Node`]
//! rather than dispatching through a trait, so the engine, the evaluators
//! and the builders all see the same four variants.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::tree::infoset::{InfoSetId, InfoSetRegistry};

/// A betting action. The discriminant is the slot used in every
/// per-action array of the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Fold = 0,
    Call = 1,
    Raise = 2,
}

impl Action {
    /// All actions in slot order.
    pub const ALL: [Action; 3] = [Action::Fold, Action::Call, Action::Raise];

    /// Array slot of this action.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Character appended to the bet history when this action is taken.
    pub fn token(self) -> char {
        match self {
            Action::Fold => 'f',
            Action::Call => 'c',
            Action::Raise => 'r',
        }
    }
}

/// Which of the three actions are available at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LegalActions([bool; 3]);

impl LegalActions {
    pub fn new(fold: bool, call: bool, raise: bool) -> Self {
        Self([fold, call, raise])
    }

    /// All three actions legal.
    pub fn all() -> Self {
        Self([true; 3])
    }

    #[inline]
    pub fn contains(&self, action: Action) -> bool {
        self.0[action.index()]
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&legal| legal).count()
    }

    /// Legal actions in slot order.
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(move |&a| self.contains(a))
    }

    /// Uniform distribution over the legal actions, zero elsewhere.
    pub fn uniform(&self) -> [f64; 3] {
        let count = self.count();
        let mut probs = [0.0; 3];
        if count == 0 {
            return probs;
        }
        for action in self.iter() {
            probs[action.index()] = 1.0 / count as f64;
        }
        probs
    }
}

/// State visible at every node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    /// Board cards in deal order.
    pub board: Vec<Card>,
    /// `/` at every round start, then one character per action.
    pub bet_history: String,
    /// Per player, the range indices of the holdings still consistent
    /// with this node.
    pub holecards: Vec<Vec<usize>>,
}

/// A dealing node.
#[derive(Debug, Clone)]
pub struct ChanceNode {
    pub info: NodeInfo,
    /// Cards dealt per outcome (per player for hole cards).
    pub to_deal: usize,
    /// Number of equally likely outcomes from one player's point of view.
    pub deal_count: f64,
    pub children: Vec<Node>,
}

/// A decision node.
#[derive(Debug, Clone)]
pub struct ActionNode {
    pub info: NodeInfo,
    pub player: usize,
    /// Children indexed by action slot; `None` for illegal actions.
    pub actions: [Option<Box<Node>>; 3],
    /// Information set of each holding of the acting player, aligned with
    /// `info.holecards[player]`.
    pub infosets: Vec<InfoSetId>,
    pub legal: LegalActions,
}

impl ActionNode {
    /// Child reached by `action`, if legal.
    pub fn child(&self, action: Action) -> Option<&Node> {
        self.actions[action.index()].as_deref()
    }

    /// Legal children in fold, call, raise order.
    pub fn children(&self) -> impl Iterator<Item = (Action, &Node)> + '_ {
        Action::ALL
            .into_iter()
            .filter_map(move |a| self.child(a).map(|node| (a, node)))
    }

    /// Information-set key of the acting player's first holding. On a
    /// per-deal tree this is the player's complete view of the node.
    pub fn player_view<'r>(&self, registry: &'r InfoSetRegistry) -> Option<&'r str> {
        self.infosets
            .first()
            .map(|&id| registry.get(id).key.as_str())
    }
}

/// Net winnings for one tuple of holdings.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffEntry {
    /// Range index of every player's holding, folded players included.
    pub hands: Vec<usize>,
    /// Net chips won by each player; sums to zero.
    pub payoffs: Vec<f64>,
}

/// Payoffs of a terminal node.
#[derive(Debug, Clone, Default)]
pub struct PayoffTable {
    pub entries: Vec<PayoffEntry>,
    /// Per player, the number of entries containing each holding, aligned
    /// with the node's `holecards`.
    pub counts: Vec<Vec<u32>>,
}

/// A node where the hand ends, by fold or showdown.
#[derive(Debug, Clone)]
pub struct TerminalNode {
    pub info: NodeInfo,
    /// Chips each player put in.
    pub committed: Vec<u32>,
    pub players_in: Vec<bool>,
    pub payoffs: PayoffTable,
}

impl TerminalNode {
    /// Payoff vector of the first entry. A per-deal tree has exactly one.
    pub fn payoffs(&self) -> &[f64] {
        self.payoffs
            .entries
            .first()
            .map(|entry| entry.payoffs.as_slice())
            .unwrap_or(&[])
    }

    /// True if every player but one folded.
    pub fn is_fold(&self) -> bool {
        self.players_in.iter().filter(|&&p| p).count() == 1
    }
}

/// A node of a game tree.
#[derive(Debug, Clone)]
pub enum Node {
    HolecardChance(ChanceNode),
    BoardcardChance(ChanceNode),
    Action(ActionNode),
    Terminal(TerminalNode),
}

impl Node {
    pub fn info(&self) -> &NodeInfo {
        match self {
            Node::HolecardChance(n) | Node::BoardcardChance(n) => &n.info,
            Node::Action(n) => &n.info,
            Node::Terminal(n) => &n.info,
        }
    }

    pub fn bet_history(&self) -> &str {
        &self.info().bet_history
    }

    pub fn board(&self) -> &[Card] {
        &self.info().board
    }

    /// Children in order: deal order for chance nodes, fold/call/raise for
    /// action nodes.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::HolecardChance(n) | Node::BoardcardChance(n) => n.children.iter().collect(),
            Node::Action(n) => n.children().map(|(_, child)| child).collect(),
            Node::Terminal(_) => Vec::new(),
        }
    }

    /// `i`-th child in [`Node::children`] order.
    pub fn child(&self, i: usize) -> Option<&Node> {
        self.children().get(i).copied()
    }

    pub fn as_action(&self) -> Option<&ActionNode> {
        match self {
            Node::Action(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_terminal(&self) -> Option<&TerminalNode> {
        match self {
            Node::Terminal(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_chance(&self) -> bool {
        matches!(self, Node::HolecardChance(_) | Node::BoardcardChance(_))
    }

    /// Visit this node and all descendants depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree.
    pub fn count_nodes(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_slots() {
        assert_eq!(Action::Fold.index(), 0);
        assert_eq!(Action::Call.index(), 1);
        assert_eq!(Action::Raise.index(), 2);
        let history: String = Action::ALL.iter().map(|a| a.token()).collect();
        assert_eq!(history, "fcr");
    }

    #[test]
    fn test_uniform_over_legal() {
        let legal = LegalActions::new(false, true, true);
        assert_eq!(legal.count(), 2);
        assert_eq!(legal.uniform(), [0.0, 0.5, 0.5]);
        assert_eq!(legal.iter().collect::<Vec<_>>(), vec![Action::Call, Action::Raise]);

        let all = LegalActions::all().uniform();
        assert!((all.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(LegalActions::default().uniform(), [0.0; 3]);
    }

    #[test]
    fn test_action_node_children_order() {
        let info = NodeInfo {
            board: Vec::new(),
            bet_history: "/".to_string(),
            holecards: vec![vec![0], vec![1]],
        };
        let leaf = |history: &str| {
            Box::new(Node::Terminal(TerminalNode {
                info: NodeInfo {
                    bet_history: history.to_string(),
                    ..info.clone()
                },
                committed: vec![1, 1],
                players_in: vec![true, true],
                payoffs: PayoffTable::default(),
            }))
        };
        let node = Node::Action(ActionNode {
            info: info.clone(),
            player: 0,
            actions: [None, Some(leaf("/c")), Some(leaf("/r"))],
            infosets: Vec::new(),
            legal: LegalActions::new(false, true, true),
        });

        let histories: Vec<&str> = node.children().iter().map(|c| c.bet_history()).collect();
        assert_eq!(histories, vec!["/c", "/r"]);
        assert_eq!(node.child(1).map(|c| c.bet_history()), Some("/r"));
        assert!(node.as_action().and_then(|n| n.child(Action::Fold)).is_none());
        assert_eq!(node.count_nodes(), 3);
        let first = node.child(0).and_then(|c| c.as_terminal()).unwrap();
        assert!(first.payoffs().is_empty());
    }
}
