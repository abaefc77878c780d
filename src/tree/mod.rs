//! Game trees.
//!
//! A [`PublicTree`] represents the dealing and betting structure of a game
//! once, carrying for every node the list of private holdings each player
//! may still have. Its action nodes know the [`InfoSetId`] of every holding
//! of the acting player, so the solver never formats a key while running.
//!
//! A [`GameTree`] expands one subtree per deal instead and is meant for
//! inspecting the rules of small games.

pub mod builder;
pub mod infoset;
pub mod node;
pub mod public;
pub mod rules;

pub use builder::{DealMode, TreeBuilder};
pub use infoset::{InfoSet, InfoSetId, InfoSetRegistry};
pub use node::{
    Action, ActionNode, ChanceNode, LegalActions, Node, NodeInfo, PayoffEntry, PayoffTable,
    TerminalNode,
};
pub use public::{GameTree, PublicTree};
pub use rules::{GameRules, HandEvaluator, InfoSetFormatter, RoundInfo};
