//! Rejection reasons for commands and configuration errors.
//!
//! A rejected command is a no-op: handlers validate before they mutate, so
//! the session is left exactly as it was and the caller gets the reason.

use thiserror::Error;

use super::seat::{SeatId, SEAT_COUNT};
use crate::session::Phase;

/// Why a command was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{command} is not allowed during {phase:?}")]
    InvalidPhaseForCommand { command: &'static str, phase: Phase },

    #[error("not your turn: {actual} acted but {expected} is up")]
    NotYourTurn { expected: SeatId, actual: SeatId },

    #[error("no seat {0} at a four-seat table")]
    UnknownSeat(u8),

    #[error("{seat} has no card at slot {index} (hand size {len})")]
    SlotOutOfRange { seat: SeatId, index: usize, len: usize },

    #[error("deck is empty")]
    DeckEmpty,

    #[error("discard pile is empty")]
    DiscardEmpty,

    #[error("a drawn card is already pending resolution")]
    AlreadyPending,

    #[error("{0} has no cards to respond with")]
    EmptyHandResponse(SeatId),

    #[error("reveal limit of {limit} reached")]
    RevealLimitReached { limit: usize },

    #[error("the opening draw must come from the deck")]
    OpeningDrawRestricted,

    #[error("end can only be declared at the start of a fresh respond window")]
    DeclareNotAllowed,

    #[error("window generation {generation} is no longer current")]
    StaleWindow { generation: u64 },

    #[error("session actor has shut down")]
    SessionClosed,
}

/// Invalid session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("turn order must list every seat exactly once: {0:?}")]
    InvalidTurnOrder([SeatId; SEAT_COUNT]),

    #[error("hand size {hand_size} cannot be dealt to four seats from a 52-card deck")]
    HandSizeTooLarge { hand_size: usize },

    #[error("hand size must be at least 1")]
    EmptyHand,

    #[error("peek limit {peek_limit} exceeds hand size {hand_size}")]
    PeekLimitTooLarge { peek_limit: usize, hand_size: usize },

    #[error("deck must hold the 52 distinct cards of one deck, got {0} cards")]
    IncompleteDeck(usize),

    #[error("{0} window must be longer than zero")]
    ZeroWindow(&'static str),

    #[error("config parse error: {0}")]
    Parse(String),
}
