//! Built trees: the public tree the solver runs on, and the per-deal tree.

use std::sync::Arc;

use crate::cards::{allowed_hands, range_size};
use crate::error::SolverError;
use crate::tree::builder::{DealMode, TreeBuilder};
use crate::tree::infoset::InfoSetRegistry;
use crate::tree::node::{ActionNode, Node};
use crate::tree::rules::GameRules;

/// Betting and dealing structure of a game with private cards kept as
/// per-player holding lists instead of separate subtrees.
///
/// The tree is immutable once built; any number of solvers may borrow it.
#[derive(Debug, Clone)]
pub struct PublicTree {
    rules: GameRules,
    root: Node,
    registry: Arc<InfoSetRegistry>,
    allowed_hands: Vec<bool>,
    range_size: usize,
}

impl PublicTree {
    /// Build the public tree of `rules` and register its information sets.
    pub fn build(rules: &GameRules) -> Result<Self, SolverError> {
        let (root, registry) = TreeBuilder::new(rules, DealMode::Public)?.build()?;
        let holecard_count = rules.holecard_count();
        Ok(Self {
            rules: rules.clone(),
            root,
            registry: Arc::new(registry),
            allowed_hands: allowed_hands(&rules.deck, holecard_count)?,
            range_size: range_size(holecard_count)?,
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn registry(&self) -> &Arc<InfoSetRegistry> {
        &self.registry
    }

    pub fn players(&self) -> usize {
        self.rules.players
    }

    pub fn holecard_count(&self) -> usize {
        self.rules.holecard_count()
    }

    /// Length of one reach row.
    pub fn range_size(&self) -> usize {
        self.range_size
    }

    /// Range indices dealable from the game's deck.
    pub fn allowed_hands(&self) -> &[bool] {
        &self.allowed_hands
    }

    pub fn num_info_sets(&self) -> usize {
        self.registry.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.root.count_nodes()
    }
}

/// Explicit tree with one subtree per deal of private cards.
///
/// Every node holds exactly one holding per player, so terminals carry a
/// single payoff vector and action nodes a single view of the acting
/// player.
#[derive(Debug, Clone)]
pub struct GameTree {
    rules: GameRules,
    root: Node,
    registry: InfoSetRegistry,
}

impl GameTree {
    pub fn build(rules: &GameRules) -> Result<Self, SolverError> {
        let (root, registry) = TreeBuilder::new(rules, DealMode::PerDeal)?.build()?;
        Ok(Self {
            rules: rules.clone(),
            root,
            registry,
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn registry(&self) -> &InfoSetRegistry {
        &self.registry
    }

    /// Formatted view of the acting player at `node`.
    pub fn player_view(&self, node: &ActionNode) -> Option<&str> {
        node.player_view(&self.registry)
    }
}
