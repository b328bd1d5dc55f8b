//! Session actor: the command queue, deadline timers and the cloneable handle.
//!
//! Timer tasks hold only a weak sender, so a dropped handle still shuts the
//! actor down.

use std::time::Instant;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info_span, Instrument};

use crate::core::{Command, CommandError, ConfigError, SessionConfig};
use crate::session::{Clock, GameSession, SessionSnapshot};

/// Reads tokio's clock, so paused-time tests drive window deadlines.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

enum Request {
    Apply {
        command: Command,
        reply: oneshot::Sender<Result<(), CommandError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Deadline {
        generation: u64,
    },
}

/// Cloneable handle to a running session actor.
///
/// The actor stops once every handle has been dropped.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Request>,
    updates: watch::Receiver<SessionSnapshot>,
}

/// Shuffle a new session and start its actor on the current tokio runtime.
pub fn spawn_session(config: SessionConfig, seed: Option<u64>) -> Result<SessionHandle, ConfigError> {
    let session = GameSession::with_clock(config, seed, TokioClock)?;
    Ok(SessionHandle::spawn(session))
}

impl SessionHandle {
    /// Start an actor for an already-built session.
    pub fn spawn(session: GameSession<TokioClock>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (updates_tx, updates) = watch::channel(session.snapshot());
        let actor = SessionActor {
            session,
            rx,
            timer_tx: tx.downgrade(),
            updates: updates_tx,
            scheduled: None,
        };
        tokio::spawn(actor.run().instrument(info_span!("session")));
        Self { tx, updates }
    }

    /// Queue a command and wait for the session's verdict.
    pub async fn apply(&self, command: Command) -> Result<(), CommandError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Apply { command, reply })
            .map_err(|_| CommandError::SessionClosed)?;
        rx.await.map_err(|_| CommandError::SessionClosed)?
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, CommandError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Snapshot { reply })
            .map_err(|_| CommandError::SessionClosed)?;
        rx.await.map_err(|_| CommandError::SessionClosed)
    }

    /// Receiver that sees a fresh snapshot after every state change,
    /// including timeouts.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.clone()
    }
}

struct SessionActor {
    session: GameSession<TokioClock>,
    rx: mpsc::UnboundedReceiver<Request>,
    timer_tx: mpsc::WeakUnboundedSender<Request>,
    updates: watch::Sender<SessionSnapshot>,
    /// Generation of the window a timer is already running for.
    scheduled: Option<u64>,
}

impl SessionActor {
    async fn run(mut self) {
        debug!("session actor started");
        while let Some(request) = self.rx.recv().await {
            match request {
                Request::Apply { command, reply } => {
                    let outcome = self.session.apply(command);
                    if outcome.is_ok() {
                        self.publish();
                    }
                    let _ = reply.send(outcome);
                }
                Request::Snapshot { reply } => {
                    let _ = reply.send(self.session.snapshot());
                }
                Request::Deadline { generation } => match self.session.apply(Command::Expire { generation }) {
                    Ok(()) => self.publish(),
                    Err(reason) => debug!(generation, %reason, "deadline dropped"),
                },
            }
            self.schedule_deadline();
        }
        debug!("session actor stopped");
    }

    fn publish(&self) {
        self.updates.send_replace(self.session.snapshot());
    }

    fn schedule_deadline(&mut self) {
        let Some(window) = self.session.active_window() else {
            return;
        };
        if self.scheduled == Some(window.generation) {
            return;
        }
        self.scheduled = Some(window.generation);

        let tx = self.timer_tx.clone();
        let generation = window.generation;
        let deadline = tokio::time::Instant::from_std(window.deadline);
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Request::Deadline { generation });
            }
        });
    }
}
