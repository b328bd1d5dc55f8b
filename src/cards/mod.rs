//! Card, deck and hand model.
//!
//! - [`Card`]: immutable `{rank, suit}` value
//! - [`Deck`]: draw deck, head first, shuffled once per session
//! - [`DiscardPile`]: append-only pile, top is the last card
//! - [`Hands`]: per-seat ordered hands addressed by [`Slot`]
//!
//! Cards are only ever relocated between these containers; the union of all
//! of them is always exactly one standard 52-card deck.

mod card;
mod deck;
mod hand;

pub use card::{Card, Power, Rank, Suit};
pub use deck::{Deck, DiscardPile, DECK_SIZE};
pub use hand::{Hands, Slot};
