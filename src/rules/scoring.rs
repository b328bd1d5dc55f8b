//! End-of-game scoring.
//!
//! Lowest total wins. Every seat tied for the minimum is a winner.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Hands};
use crate::core::{SeatId, SeatMap};

/// Total point value of a hand.
#[must_use]
pub fn hand_score<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u32 {
    cards.into_iter().map(|c| c.rank.value()).sum()
}

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Per-seat hand totals at the moment the game ended.
    pub scores: SeatMap<u32>,
    /// Seats sharing the minimum score, in seat order.
    pub winners: Vec<SeatId>,
}

impl GameResult {
    /// Score every hand and pick the winner set.
    #[must_use]
    pub fn from_hands(hands: &Hands) -> Self {
        let scores = SeatMap::new(|seat| hand_score(hands.hand(seat)));
        let min = scores.iter().map(|(_, &s)| s).min().unwrap_or(0);
        let winners = scores
            .iter()
            .filter(|(_, &s)| s == min)
            .map(|(seat, _)| seat)
            .collect();
        Self { scores, winners }
    }

    /// Check if a seat won.
    #[must_use]
    pub fn is_winner(&self, seat: SeatId) -> bool {
        self.winners.contains(&seat)
    }

    #[must_use]
    pub fn score(&self, seat: SeatId) -> u32 {
        self.scores[seat]
    }
}
