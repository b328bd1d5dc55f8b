//! Core engine types: seats, turn order, RNG, configuration, commands, errors.
//!
//! These are the building blocks the session state machine is assembled from.

pub mod seat;
pub mod rng;
pub mod config;
pub mod command;
pub mod error;

pub use seat::{SeatId, SeatMap, SeatOrder, TurnOrder, SEAT_COUNT};
pub use rng::GameRng;
pub use config::SessionConfig;
pub use command::{Command, CommandRecord};
pub use error::{CommandError, ConfigError};
