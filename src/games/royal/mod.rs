//! Royal Hold'em.
//!
//! An 8-card game (two suits of Jack through Ace) with one private card
//! and two board cards dealt over three betting rounds. Hands rank as
//! flush, then straight, then a pair using the private card, then the private
//! card alone. Information-set keys mark each board card as suited (`s`) or
//! offsuit (`o`) relative to the private card.

use crate::cards::card::{
    Card, RANK_ACE, RANK_JACK, RANK_KING, RANK_QUEEN, SUIT_HEARTS, SUIT_SPADES,
};
use crate::tree::{GameRules, RoundInfo};

pub fn royal_format(
    _player: usize,
    holecards: &[Card],
    board: &[Card],
    bet_history: &str,
) -> String {
    let mut cards = String::new();
    if let Some(hole) = holecards.first() {
        cards.push(hole.rank_char());
        for card in board {
            cards.push(card.rank_char());
            cards.push(if card.suit() == hole.suit() { 's' } else { 'o' });
        }
    }
    format!("{}:{}:", cards, bet_history)
}

/// Score of a private card with a complete two-card board.
pub fn royal_eval(holecards: &[Card], board: &[Card]) -> u32 {
    let hand: Vec<Card> = holecards.iter().chain(board).copied().collect();
    if hand.len() < 3 {
        return hand.first().map_or(0, |card| card.rank() as u32);
    }
    let hole = hand[0];

    if hand[1..].iter().all(|card| card.suit() == hole.suit()) {
        return 10_000 + hole.rank() as u32;
    }

    let has = |rank: u8| hand.iter().any(|card| card.rank() == rank);
    if has(RANK_QUEEN) && has(RANK_KING) {
        if has(RANK_ACE) {
            return 1_000 + RANK_ACE as u32;
        }
        if has(RANK_JACK) {
            return 1_000 + RANK_JACK as u32;
        }
    }

    if hand[1..].iter().any(|card| card.rank() == hole.rank()) {
        return 100 + hole.rank() as u32;
    }
    hole.rank() as u32
}

/// Rules of two-player Royal Hold'em.
pub fn royal_rules() -> GameRules {
    let mut deck = Vec::with_capacity(8);
    for rank in [RANK_ACE, RANK_KING, RANK_QUEEN, RANK_JACK] {
        deck.push(Card::new(rank, SUIT_SPADES));
        deck.push(Card::new(rank, SUIT_HEARTS));
    }

    GameRules {
        players: 2,
        deck,
        rounds: vec![
            RoundInfo::new(1, 0, 2, vec![2, 2]),
            RoundInfo::new(0, 1, 4, vec![2, 2]),
            RoundInfo::new(0, 1, 4, vec![2, 2]),
        ],
        ante: 1,
        blinds: None,
        hand_eval: royal_eval,
        infoset_format: royal_format,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::{CFRConfig, CFRSolver};
    use crate::tree::PublicTree;

    fn cards(s: &[&str]) -> Vec<Card> {
        s.iter().map(|c| c.parse().unwrap()).collect()
    }

    #[test]
    fn test_royal_eval_categories() {
        let flush = royal_eval(&cards(&["Js"]), &cards(&["Qs", "As"]));
        let straight = royal_eval(&cards(&["Ah"]), &cards(&["Ks", "Qs"]));
        let low_straight = royal_eval(&cards(&["Jh"]), &cards(&["Ks", "Qh"]));
        let pair = royal_eval(&cards(&["Ah"]), &cards(&["As", "Jh"]));
        let high = royal_eval(&cards(&["Ah"]), &cards(&["Js", "Jh"]));

        assert_eq!(flush, 10_000 + 11);
        assert_eq!(straight, 1_014);
        assert_eq!(low_straight, 1_011);
        assert_eq!(pair, 114);
        assert_eq!(high, 14);
        assert!(flush > straight && straight > low_straight && low_straight > pair && pair > high);
    }

    #[test]
    fn test_royal_format_marks_suits() {
        assert_eq!(royal_format(0, &cards(&["Ks"]), &[], "/"), "K:/:");
        assert_eq!(
            royal_format(1, &cards(&["Ks"]), &cards(&["As", "Qh"]), "/cc/cc/"),
            "KAsQo:/cc/cc/:"
        );
    }

    #[test]
    fn test_royal_tree_builds_and_trains() {
        let tree = PublicTree::build(&royal_rules()).unwrap();
        let root = tree.root();
        let first_board = root.child(0).unwrap().child(0).unwrap().child(0).unwrap();
        assert_eq!(first_board.bet_history(), "/cc/");
        assert_eq!(first_board.children().len(), 8);

        let mut solver = CFRSolver::new(&tree, CFRConfig::default()).unwrap();
        solver.run(2);
        let profile = solver.average_profile();
        let probs = profile.probs(0, "A:/:");
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}
