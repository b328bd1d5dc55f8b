//! Command surface accepted by a game session.
//!
//! Commands are the only way to mutate a [`GameSession`](crate::session::GameSession).
//! They are plain data so a transport layer can relay them into the single
//! authoritative session for a room.
//!
//! ```
//! use kabo_engine::core::{Command, SeatId};
//!
//! let swap = Command::ResolveBySwap { seat: SeatId::new(0), index: 2 };
//! assert_eq!(swap.name(), "resolve_by_swap");
//! assert_eq!(swap.seat(), Some(SeatId::new(0)));
//! ```

use serde::{Deserialize, Serialize};

use super::seat::SeatId;
use crate::session::Phase;

/// A command issued against a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Deal the opening hands and open the first peek window.
    DealAll,
    /// Reveal one of the peeking seat's own cards.
    PeekReveal { seat: SeatId, index: usize },
    /// Draw the head of the deck.
    DrawFromDeck,
    /// Draw the top of the discard pile.
    DrawFromDiscard,
    /// Put the drawn card on the discard pile.
    ResolveByDiscard,
    /// Put the drawn card into a hand slot, discarding the card it replaces.
    ResolveBySwap { seat: SeatId, index: usize },
    /// Queen power: reveal one card anywhere.
    LookReveal { seat: SeatId, index: usize },
    /// Jack power: pick one of the two slots to swap.
    JokerPick { seat: SeatId, index: usize },
    /// Play a card from hand during a respond window.
    RespondPlay { seat: SeatId, index: usize },
    /// Declare end of round.
    DeclareEnd,
    /// Deadline callback for the window with this generation.
    Expire { generation: u64 },
}

impl Command {
    /// Stable name, used in logs and rejection reasons.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::DealAll => "deal_all",
            Command::PeekReveal { .. } => "peek_reveal",
            Command::DrawFromDeck => "draw_from_deck",
            Command::DrawFromDiscard => "draw_from_discard",
            Command::ResolveByDiscard => "resolve_by_discard",
            Command::ResolveBySwap { .. } => "resolve_by_swap",
            Command::LookReveal { .. } => "look_reveal",
            Command::JokerPick { .. } => "joker_pick",
            Command::RespondPlay { .. } => "respond_play",
            Command::DeclareEnd => "declare_end",
            Command::Expire { .. } => "expire",
        }
    }

    /// Seat named by the command, if any.
    #[must_use]
    pub fn seat(&self) -> Option<SeatId> {
        match *self {
            Command::PeekReveal { seat, .. }
            | Command::ResolveBySwap { seat, .. }
            | Command::LookReveal { seat, .. }
            | Command::JokerPick { seat, .. }
            | Command::RespondPlay { seat, .. } => Some(seat),
            _ => None,
        }
    }
}

/// An accepted command with metadata for history tracking.
///
/// Used for replay and debugging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// The command applied.
    pub command: Command,

    /// Phase the session was in when the command was accepted.
    pub phase: Phase,

    /// Position in the session's history.
    pub sequence: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_seat() {
        assert_eq!(Command::DrawFromDeck.seat(), None);
        assert_eq!(
            Command::RespondPlay { seat: SeatId::new(3), index: 0 }.seat(),
            Some(SeatId::new(3))
        );
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::JokerPick { seat: SeatId::new(1), index: 2 };
        let json = serde_json::to_string(&command).unwrap();
        assert!(json.contains("\"type\":\"joker_pick\""));

        let deserialized: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(command, deserialized);
    }

    #[test]
    fn test_command_record_serialization() {
        let record = CommandRecord {
            command: Command::Expire { generation: 7 },
            phase: Phase::Respond,
            sequence: 3,
        };

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: CommandRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
