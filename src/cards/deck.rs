//! Draw deck and discard pile.
//!
//! Both are ordered and backed by `im::Vector`, so snapshotting them for the
//! presentation layer is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::{Card, Rank, Suit};
use crate::core::{CommandError, GameRng};

/// Cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// Draw deck. The head (index 0) is the next card drawn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// All 52 cards, suit by suit, ace through king.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            cards: Suit::ALL
                .iter()
                .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
                .collect(),
        }
    }

    /// A full deck in uniformly random order.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut cards: Vec<Card> = Self::standard().cards.into_iter().collect();
        rng.shuffle(&mut cards);
        Self::from_cards(cards)
    }

    /// Deck with a fixed order, head first.
    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Remove and return the head card.
    pub fn draw(&mut self) -> Result<Card, CommandError> {
        self.cards.pop_front().ok_or(CommandError::DeckEmpty)
    }

    /// Draw up to `count` cards; fewer if the deck runs out.
    pub fn draw_up_to(&mut self, count: usize) -> Vec<Card> {
        let take = count.min(self.cards.len());
        let rest = self.cards.split_off(take);
        let drawn = std::mem::replace(&mut self.cards, rest);
        drawn.into_iter().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &Vector<Card> {
        &self.cards
    }
}

/// Discard pile. The top is the most recently appended card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardPile {
    cards: Vector<Card>,
}

impl DiscardPile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn discard(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    /// Peek at the top card without removing it.
    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.cards.back()
    }

    pub fn take_top(&mut self) -> Option<Card> {
        self.cards.pop_back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards bottom to top.
    #[must_use]
    pub fn cards(&self) -> &Vector<Card> {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_standard_deck_is_complete() {
        let deck = Deck::standard();
        assert_eq!(deck.len(), DECK_SIZE);

        let unique: FxHashSet<Card> = deck.cards().iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn test_shuffled_is_seed_deterministic() {
        let a = Deck::shuffled(&mut GameRng::new(9));
        let b = Deck::shuffled(&mut GameRng::new(9));
        let c = Deck::shuffled(&mut GameRng::new(10));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Deck::standard());
    }

    #[test]
    fn test_draw_from_head() {
        let first = Card::new(Rank::Five, Suit::Clubs);
        let second = Card::new(Rank::King, Suit::Hearts);
        let mut deck = Deck::from_cards([first, second]);

        assert_eq!(deck.draw(), Ok(first));
        assert_eq!(deck.draw(), Ok(second));
        assert_eq!(deck.draw(), Err(CommandError::DeckEmpty));
    }

    #[test]
    fn test_draw_up_to_is_best_effort() {
        let mut deck = Deck::from_cards(Deck::standard().cards().iter().copied().take(3));

        assert_eq!(deck.draw_up_to(2).len(), 2);
        assert_eq!(deck.draw_up_to(2).len(), 1);
        assert!(deck.draw_up_to(2).is_empty());
        assert!(deck.is_empty());
    }

    #[test]
    fn test_discard_pile_top() {
        let mut pile = DiscardPile::new();
        assert!(pile.top().is_none());

        let a = Card::new(Rank::Two, Suit::Spades);
        let b = Card::new(Rank::Queen, Suit::Diamonds);
        pile.discard(a);
        pile.discard(b);

        assert_eq!(pile.top(), Some(&b));
        assert_eq!(pile.take_top(), Some(b));
        assert_eq!(pile.top(), Some(&a));
        assert_eq!(pile.len(), 1);
    }

    #[test]
    fn test_head_card_is_uniform_across_seeds() {
        let mut counts: std::collections::HashMap<Card, u32> = Default::default();
        let runs = 52_000u64;
        for seed in 0..runs {
            let deck = Deck::shuffled(&mut GameRng::new(seed));
            *counts.entry(deck.cards()[0]).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), DECK_SIZE);
        for (card, &count) in &counts {
            assert!((750..1250).contains(&count), "{card} drawn first {count} times");
        }
    }
}
