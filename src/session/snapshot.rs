//! Observable session state for the presentation layer.
//!
//! A [`SessionSnapshot`] is a self-contained copy of everything a view needs
//! to render the table. Hiding unrevealed cards is left to the consumer.
//! Deck, hands and pile are `im` vectors, so taking a snapshot is cheap.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::state::{GameSession, LookReveal, Phase, PowerState, TurnStep};
use super::window::{timer_text, Clock, WindowKind};
use crate::cards::{Card, Deck, DiscardPile, Hands, Rank, Slot};
use crate::core::{SeatId, TurnOrder};
use crate::rules::GameResult;

/// Snapshot encode/decode failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub turn_order: TurnOrder,
    pub turn_seat: SeatId,
    pub turn_step: TurnStep,
    pub drawn: Option<Card>,

    pub peek_seat: Option<SeatId>,
    pub peek_revealed: Vec<usize>,

    pub power: Option<PowerState>,
    pub look_result: Option<LookReveal>,

    pub responder: Option<SeatId>,
    pub respond_target: Option<Rank>,
    pub pending_next_turn: SeatId,
    pub declarer: Option<SeatId>,

    pub deck: Deck,
    pub hands: Hands,
    pub discard_pile: DiscardPile,

    pub window: Option<WindowKind>,
    pub remaining: Option<Duration>,
    pub status: String,
    pub timer: Option<String>,

    pub result: Option<GameResult>,
}

impl SessionSnapshot {
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }

    #[must_use]
    pub fn joker_first_pick(&self) -> Option<Slot> {
        self.power.and_then(|p| p.joker_first)
    }
}

impl<C: Clock> GameSession<C> {
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            turn_order: self.config.turn_order,
            turn_seat: self.turn_seat,
            turn_step: self.turn_step,
            drawn: self.drawn,
            peek_seat: self.peek_seat,
            peek_revealed: self.peek_revealed.to_vec(),
            power: self.power,
            look_result: self.look_result,
            responder: self.responder(),
            respond_target: self.respond.as_ref().map(|r| r.target),
            pending_next_turn: self.pending_next_turn,
            declarer: self.declarer,
            deck: self.deck.clone(),
            hands: self.hands.clone(),
            discard_pile: self.pile.clone(),
            window: self.window.map(|w| w.kind),
            remaining: self.remaining(),
            status: self.status_label(),
            timer: self.timer_text(),
            result: self.result.clone(),
        }
    }

    /// Short status line for the table, e.g. `P2 RESPOND`.
    #[must_use]
    pub fn status_label(&self) -> String {
        match self.phase {
            Phase::Init => "READY".to_string(),
            Phase::Dealing | Phase::Dealt => "DEALING".to_string(),
            Phase::Peek => match self.peek_seat {
                Some(seat) => format!(
                    "P{} LOOK {}/{}",
                    seat.display_number(),
                    self.peek_revealed.len(),
                    self.config.peek_limit
                ),
                None => "PEEK".to_string(),
            },
            Phase::PeekDone => "PEEK DONE".to_string(),
            Phase::Turn => {
                let step = match self.turn_step {
                    TurnStep::Draw => "DRAW",
                    TurnStep::Resolve => "PLAY",
                };
                format!("P{} {step}", self.turn_seat.display_number())
            }
            Phase::Look | Phase::Joker => {
                let word = if self.phase == Phase::Look { "LOOK" } else { "JOKER" };
                match self.power {
                    Some(power) => format!("P{} {word}", power.actor.display_number()),
                    None => word.to_string(),
                }
            }
            Phase::Respond => match self.responder() {
                Some(seat) => format!("P{} RESPOND", seat.display_number()),
                None => "RESPOND".to_string(),
            },
            Phase::GameOver => "GAME OVER".to_string(),
        }
    }

    /// Countdown for the active window, `m:ss`.
    #[must_use]
    pub fn timer_text(&self) -> Option<String> {
        self.remaining().map(timer_text)
    }
}
