//! Async host for a game session.
//!
//! One tokio task owns each [`GameSession`](crate::session::GameSession) and
//! applies commands strictly one at a time from a queue. Deadline callbacks
//! are ordinary queue entries carrying the window generation they were
//! scheduled for, so a late timer can never race a player command.

mod actor;

pub use actor::{spawn_session, SessionHandle, TokioClock};
