//! Hand-range indexing.
//!
//! Private holdings of one or two cards are mapped onto a dense index over
//! the canonical 52-card space, so per-hand state can live in flat arrays:
//!
//! - one card: index = canonical card position, 52 slots;
//! - two cards: unordered pairs numbered by (low, high) position,
//!   `"2h2s"` => `0`, `"2d2s"` => `1`, ..., `"AcAd"` => `1325`.
//!
//! Both directions are lookup tables built on first use. Which indices are
//! actually dealable in a given game is decided by the caller through
//! [`allowed_hands`].

use once_cell::sync::Lazy;

use super::card::{Card, NUM_CARDS};
use crate::error::SolverError;

/// Number of distinct two-card holdings, C(52, 2).
pub const NUM_PAIRS: usize = NUM_CARDS * (NUM_CARDS - 1) / 2;

static SINGLE_CARDS: Lazy<Vec<[Card; 1]>> =
    Lazy::new(|| (0..NUM_CARDS).map(|i| [Card::from_index(i)]).collect());

/// Canonical (descending) pair for each two-card index.
static PAIR_CARDS: Lazy<Vec<[Card; 2]>> = Lazy::new(|| {
    let mut pairs = Vec::with_capacity(NUM_PAIRS);
    for low in 0..NUM_CARDS {
        for high in (low + 1)..NUM_CARDS {
            pairs.push([Card::from_index(high), Card::from_index(low)]);
        }
    }
    pairs
});

/// Two-card index for each ordered pair of card positions; the diagonal is unused.
static PAIR_INDEX: Lazy<Vec<[u16; NUM_CARDS]>> = Lazy::new(|| {
    let mut table = vec![[u16::MAX; NUM_CARDS]; NUM_CARDS];
    for (index, pair) in PAIR_CARDS.iter().enumerate() {
        let (high, low) = (pair[0].index(), pair[1].index());
        table[high][low] = index as u16;
        table[low][high] = index as u16;
    }
    table
});

/// Number of range slots for holdings of `holecard_count` cards.
pub fn range_size(holecard_count: usize) -> Result<usize, SolverError> {
    match holecard_count {
        1 => Ok(NUM_CARDS),
        2 => Ok(NUM_PAIRS),
        n => Err(SolverError::UnsupportedHolecardCount(n)),
    }
}

/// Sort a holding into canonical order: descending by rank, then suit.
pub fn canonicalize(cards: &[Card]) -> Vec<Card> {
    let mut sorted = cards.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
}

/// Range index of a holding. The result does not depend on card order.
///
/// # Panics
/// Panics for holdings that are not one or two distinct cards.
#[inline]
pub fn range_index(cards: &[Card]) -> usize {
    match *cards {
        [card] => card.index(),
        [a, b] => {
            assert!(a != b, "holding repeats card {}", a);
            PAIR_INDEX[a.index()][b.index()] as usize
        }
        _ => panic!("unsupported holding size {}", cards.len()),
    }
}

/// Cards of the holding at `index`, in canonical order.
///
/// # Panics
/// Panics if `holecard_count` is unsupported or `index` is out of range.
#[inline]
pub fn range_cards(holecard_count: usize, index: usize) -> &'static [Card] {
    match holecard_count {
        1 => &SINGLE_CARDS[index],
        2 => &PAIR_CARDS[index],
        n => panic!("unsupported holding size {}", n),
    }
}

/// Mask over range indices marking holdings made only of cards in `deck`.
pub fn allowed_hands(deck: &[Card], holecard_count: usize) -> Result<Vec<bool>, SolverError> {
    let size = range_size(holecard_count)?;
    let mut in_deck = [false; NUM_CARDS];
    for card in deck {
        in_deck[card.index()] = true;
    }
    Ok((0..size)
        .map(|index| {
            range_cards(holecard_count, index)
                .iter()
                .all(|card| in_deck[card.index()])
        })
        .collect())
}
