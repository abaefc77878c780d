//! Card model and hand-range indexing.

pub mod card;
pub mod hand_range;

pub use card::{cards_mask, cards_to_string, full_deck, Card, NUM_CARDS};
pub use hand_range::{allowed_hands, canonicalize, range_cards, range_index, range_size, NUM_PAIRS};
