//! Information-set registry.
//!
//! Every (acting player, formatted key) pair seen while building a tree is
//! registered once and given a dense [`InfoSetId`]. Action nodes store the
//! ids of their holdings, so the solver indexes its flat tables directly
//! and never formats or hashes a key on the hot path.

use rustc_hash::FxHashMap;

use crate::tree::node::LegalActions;

/// Dense identifier of a registered information set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InfoSetId(pub u32);

impl InfoSetId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A registered information set.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoSet {
    pub player: usize,
    pub key: String,
    pub legal: LegalActions,
}

/// Bijection between (player, key) pairs and dense ids.
#[derive(Debug, Clone, Default)]
pub struct InfoSetRegistry {
    /// One key map per player.
    index: Vec<FxHashMap<String, InfoSetId>>,
    entries: Vec<InfoSet>,
}

impl InfoSetRegistry {
    pub fn new(players: usize) -> Self {
        Self {
            index: vec![FxHashMap::default(); players],
            entries: Vec::new(),
        }
    }

    /// Id of `(player, key)`, registering it on first sight.
    ///
    /// A key seen again keeps the legal actions it was first registered
    /// with.
    pub fn register(&mut self, player: usize, key: String, legal: LegalActions) -> InfoSetId {
        if player >= self.index.len() {
            self.index.resize_with(player + 1, FxHashMap::default);
        }
        if let Some(&id) = self.index[player].get(&key) {
            debug_assert_eq!(
                self.entries[id.index()].legal, legal,
                "information set {} reached with different legal actions",
                key
            );
            return id;
        }

        let id = InfoSetId(self.entries.len() as u32);
        self.index[player].insert(key.clone(), id);
        self.entries.push(InfoSet { player, key, legal });
        id
    }

    pub fn lookup(&self, player: usize, key: &str) -> Option<InfoSetId> {
        self.index.get(player)?.get(key).copied()
    }

    /// # Panics
    /// Panics if `id` was not issued by this registry.
    #[inline]
    pub fn get(&self, id: InfoSetId) -> &InfoSet {
        &self.entries[id.index()]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered sets in id order.
    pub fn iter(&self) -> impl Iterator<Item = (InfoSetId, &InfoSet)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, set)| (InfoSetId(i as u32), set))
    }
}
