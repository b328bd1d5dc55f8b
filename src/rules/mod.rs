//! Game rules that sit outside the session state machine.
//!
//! - `scoring`: hand totals and the winner set

pub mod scoring;

pub use scoring::{hand_score, GameResult};
