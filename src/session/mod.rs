//! The game session state machine.
//!
//! [`GameSession`] owns one game from deal to scoring. Each stage lives in
//! its own file as an `impl` block on the session:
//!
//! - `peek`: deal and per-seat peek windows
//! - `turn`: draw, then discard or swap
//! - `power`: Look and Joker windows
//! - `respond`: respond window, penalties, declare end
//! - `window`: deadlines, generations and clocks
//! - `snapshot`: observable state and display labels

mod peek;
mod power;
mod respond;
mod snapshot;
mod state;
mod turn;
mod window;

pub use snapshot::{SessionSnapshot, SnapshotError};
pub use state::{GameSession, LookReveal, Phase, PowerState, RespondState, TurnStep};
pub use window::{seconds_left, timer_text, Clock, ManualClock, SystemClock, TimedWindow, WindowKind};
