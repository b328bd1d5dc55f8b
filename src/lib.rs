//! # kabo-engine
//!
//! Authoritative rules engine for a four-seat Kabo-style card game: deal,
//! peek, draw and resolve, queen/jack powers, the respond window with
//! mismatch penalties, declare end, and scoring.
//!
//! ## Design Principles
//!
//! 1. **Single writer**: a [`GameSession`] changes only through commands,
//!    applied one at a time. A rejected command leaves it untouched.
//!
//! 2. **Deadlines, not ticks**: timed windows store a deadline and a
//!    generation. Expiry is just another command, and a stale one is refused.
//!
//! 3. **Presentation-free**: the engine exposes full state through
//!    [`SessionSnapshot`]; hiding cards is up to the view.
//!
//! ## Modules
//!
//! - `core`: seats, turn order, RNG, configuration, commands, errors
//! - `cards`: cards, deck, discard pile and hands
//! - `rules`: scoring
//! - `session`: the phase state machine and timed windows
//! - `runtime`: tokio actor hosting a session

pub mod cards;
pub mod core;
pub mod rules;
pub mod runtime;
pub mod session;

pub use crate::core::{
    Command, CommandError, CommandRecord, ConfigError, GameRng, SeatId, SeatMap, SessionConfig,
    TurnOrder, SEAT_COUNT,
};

pub use crate::cards::{Card, Deck, DiscardPile, Hands, Power, Rank, Slot, Suit, DECK_SIZE};

pub use crate::rules::{hand_score, GameResult};

pub use crate::session::{
    Clock, GameSession, ManualClock, Phase, SessionSnapshot, SystemClock, TimedWindow, TurnStep,
    WindowKind,
};

pub use crate::runtime::{spawn_session, SessionHandle, TokioClock};
