//! Per-seat hands.
//!
//! A hand is an ordered sequence whose length changes as cards are played
//! away or penalty cards arrive. Slot indices are what swap, peek and respond
//! commands target.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::Card;
use crate::core::{CommandError, SeatId, SeatMap};

/// A position in one seat's hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub seat: SeatId,
    pub index: usize,
}

impl Slot {
    #[must_use]
    pub const fn new(seat: SeatId, index: usize) -> Self {
        Self { seat, index }
    }
}

/// Hands for all four seats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hands {
    hands: SeatMap<Vector<Card>>,
}

impl Default for Hands {
    fn default() -> Self {
        Self::new()
    }
}

impl Hands {
    /// Four empty hands.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hands: SeatMap::with_default(),
        }
    }

    /// Hands with fixed contents, mostly for tests and replays.
    #[must_use]
    pub fn from_cards(cards: SeatMap<Vec<Card>>) -> Self {
        Self {
            hands: SeatMap::new(|seat| cards[seat].iter().copied().collect()),
        }
    }

    #[must_use]
    pub fn hand(&self, seat: SeatId) -> &Vector<Card> {
        &self.hands[seat]
    }

    #[must_use]
    pub fn len(&self, seat: SeatId) -> usize {
        self.hands[seat].len()
    }

    #[must_use]
    pub fn is_empty(&self, seat: SeatId) -> bool {
        self.hands[seat].is_empty()
    }

    /// Cards across all hands.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.hands.iter().map(|(_, h)| h.len()).sum()
    }

    /// Validate that a slot exists.
    pub fn check(&self, slot: Slot) -> Result<(), CommandError> {
        if !slot.seat.is_valid() {
            return Err(CommandError::UnknownSeat(slot.seat.0));
        }
        let len = self.len(slot.seat);
        if slot.index < len {
            Ok(())
        } else {
            Err(CommandError::SlotOutOfRange {
                seat: slot.seat,
                index: slot.index,
                len,
            })
        }
    }

    pub fn at(&self, slot: Slot) -> Result<Card, CommandError> {
        self.check(slot)?;
        Ok(self.hands[slot.seat][slot.index])
    }

    /// Put `card` into `slot`, returning the card it displaced.
    pub fn replace(&mut self, slot: Slot, card: Card) -> Result<Card, CommandError> {
        self.check(slot)?;
        Ok(self.hands[slot.seat].set(slot.index, card))
    }

    pub fn append(&mut self, seat: SeatId, cards: impl IntoIterator<Item = Card>) {
        self.hands[seat].extend(cards);
    }

    pub fn remove_at(&mut self, slot: Slot) -> Result<Card, CommandError> {
        self.check(slot)?;
        Ok(self.hands[slot.seat].remove(slot.index))
    }

    /// Exchange the cards in two slots. Neither card changes hands otherwise.
    pub fn swap(&mut self, a: Slot, b: Slot) -> Result<(), CommandError> {
        let card_a = self.at(a)?;
        let card_b = self.at(b)?;
        self.hands[a.seat].set(a.index, card_b);
        self.hands[b.seat].set(b.index, card_a);
        Ok(())
    }

    /// Iterate over (SeatId, hand) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SeatId, &Vector<Card>)> {
        self.hands.iter()
    }
}
