//! Game session aggregate and phase controller.
//!
//! ## GameSession
//!
//! Holds everything a game needs: phase, turn order, the seat on turn, the
//! pending drawn card, peek/power/respond sub-state, the end declaration and
//! the deck, hands and discard pile.
//!
//! It is mutated only through [`GameSession::apply`] (or the named command
//! methods that wrap it). Every handler validates before it mutates, so a
//! rejected command leaves the session untouched.
//!
//! ## Phases
//!
//! `Init → Dealing → Dealt → Peek → PeekDone → Turn ⇄ {Look, Joker} ⇄ Respond
//! → Turn → … → GameOver`

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::Duration;
use tracing::{debug, info};

use super::window::{Clock, SystemClock, TimedWindow, WindowKind};
use crate::cards::{Card, Deck, DiscardPile, Hands, Power, Rank, Slot, DECK_SIZE};
use crate::core::{
    Command, CommandError, CommandRecord, ConfigError, GameRng, SeatId, SeatOrder,
    SessionConfig, TurnOrder,
};
use crate::rules::GameResult;

/// Top-level session phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Init,
    Dealing,
    Dealt,
    Peek,
    PeekDone,
    Turn,
    Look,
    Joker,
    Respond,
    GameOver,
}

/// Step within the seat-on-turn's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnStep {
    Draw,
    Resolve,
}

/// An open Look or Joker power window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerState {
    pub kind: Power,
    /// Seat that played the power card.
    pub actor: SeatId,
    /// First Joker pick, waiting for its partner.
    pub joker_first: Option<Slot>,
}

/// Respond window bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondState {
    /// Turn order rotated to start at the seat who played last.
    pub order: SeatOrder,
    /// Position of the active responder in `order`.
    pub index: usize,
    /// Rank a response must match to avoid the penalty.
    pub target: Rank,
    /// Set once any response has restarted the order.
    pub restarted: bool,
}

impl RespondState {
    pub(super) fn opened_by(turn_order: &TurnOrder, seat: SeatId, target: Rank, restarted: bool) -> Self {
        Self {
            order: turn_order.rotated_from(seat),
            index: 0,
            target,
            restarted,
        }
    }

    #[must_use]
    pub fn responder(&self) -> Option<SeatId> {
        self.order.get(self.index).copied()
    }
}

/// The card revealed by the most recent Look window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookReveal {
    pub viewer: SeatId,
    pub slot: Slot,
    pub card: Card,
}

/// One game's authoritative state.
pub struct GameSession<C: Clock = SystemClock> {
    pub(super) config: SessionConfig,
    pub(super) clock: C,
    seed: Option<u64>,

    pub(super) phase: Phase,
    pub(super) deck: Deck,
    pub(super) hands: Hands,
    pub(super) pile: DiscardPile,

    // Peek stage
    pub(super) peek_seat: Option<SeatId>,
    pub(super) peek_revealed: SmallVec<[usize; 2]>,

    // Turn engine
    pub(super) turn_seat: SeatId,
    pub(super) turn_step: TurnStep,
    pub(super) drawn: Option<Card>,
    pub(super) opening_turn_complete: bool,

    // Power resolver
    pub(super) power: Option<PowerState>,
    pub(super) look_result: Option<LookReveal>,

    // Respond window
    pub(super) respond: Option<RespondState>,
    pub(super) pending_next_turn: SeatId,
    pub(super) declarer: Option<SeatId>,

    pub(super) window: Option<TimedWindow>,
    generation: u64,

    pub(super) result: Option<GameResult>,
    history: Vector<CommandRecord>,
}

impl GameSession<SystemClock> {
    /// Start a session on the wall clock, shuffling a fresh deck.
    ///
    /// With `seed` the shuffle is reproducible; without it the deck is
    /// shuffled from entropy.
    pub fn start(config: SessionConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        Self::with_clock(config, seed, SystemClock)
    }
}

impl<C: Clock> GameSession<C> {
    /// Start a session on a caller-supplied clock.
    pub fn with_clock(config: SessionConfig, seed: Option<u64>, clock: C) -> Result<Self, ConfigError> {
        let mut rng = match seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        let deck = Deck::shuffled(&mut rng);
        let mut session = Self::from_deck(config, deck, clock)?;
        session.seed = Some(rng.seed());
        Ok(session)
    }

    /// Start a session with a fixed deck order, head first.
    ///
    /// The deck must be a permutation of the 52-card deck.
    pub fn from_deck(config: SessionConfig, deck: Deck, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let distinct: FxHashSet<Card> = deck.cards().iter().copied().collect();
        if deck.len() != DECK_SIZE || distinct.len() != DECK_SIZE {
            return Err(ConfigError::IncompleteDeck(deck.len()));
        }

        let first = config.turn_order.first();
        info!(turn_order = ?config.turn_order.seats(), "session created");
        Ok(Self {
            config,
            clock,
            seed: None,
            phase: Phase::Init,
            deck,
            hands: Hands::new(),
            pile: DiscardPile::new(),
            peek_seat: None,
            peek_revealed: SmallVec::new(),
            turn_seat: first,
            turn_step: TurnStep::Draw,
            drawn: None,
            opening_turn_complete: false,
            power: None,
            look_result: None,
            respond: None,
            pending_next_turn: first,
            declarer: None,
            window: None,
            generation: 0,
            result: None,
            history: Vector::new(),
        })
    }

    // === Command dispatch ===

    /// Apply one command.
    ///
    /// On `Err` the session is unchanged and the error names the reason.
    pub fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        let phase = self.phase;
        let outcome = if phase == Phase::GameOver {
            Err(self.wrong_phase(command.name()))
        } else if let Some(seat) = command.seat().filter(|s| !s.is_valid()) {
            Err(CommandError::UnknownSeat(seat.0))
        } else {
            self.dispatch(command)
        };

        match &outcome {
            Ok(()) => {
                debug!(command = command.name(), ?phase, "command accepted");
                let sequence = self.history.len() as u32;
                self.history.push_back(CommandRecord { command, phase, sequence });
            }
            Err(reason) => {
                debug!(command = command.name(), ?phase, %reason, "command rejected");
            }
        }
        outcome
    }

    fn dispatch(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::DealAll => self.handle_deal_all(),
            Command::PeekReveal { seat, index } => self.handle_peek_reveal(Slot::new(seat, index)),
            Command::DrawFromDeck => self.handle_draw_from_deck(),
            Command::DrawFromDiscard => self.handle_draw_from_discard(),
            Command::ResolveByDiscard => self.handle_resolve_by_discard(),
            Command::ResolveBySwap { seat, index } => self.handle_resolve_by_swap(Slot::new(seat, index)),
            Command::LookReveal { seat, index } => self.handle_look_reveal(Slot::new(seat, index)),
            Command::JokerPick { seat, index } => self.handle_joker_pick(Slot::new(seat, index)),
            Command::RespondPlay { seat, index } => self.handle_respond_play(Slot::new(seat, index)),
            Command::DeclareEnd => self.handle_declare_end(),
            Command::Expire { generation } => self.handle_expire(generation),
        }
    }

    pub(super) fn wrong_phase(&self, command: &'static str) -> CommandError {
        CommandError::InvalidPhaseForCommand {
            command,
            phase: self.phase,
        }
    }

    pub(super) fn require_phase(&self, command: &'static str, phase: Phase) -> Result<(), CommandError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(self.wrong_phase(command))
        }
    }

    pub(super) fn set_phase(&mut self, next: Phase) {
        info!(from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
    }

    // === Timed windows ===

    /// Open a window, superseding any window still open.
    pub(super) fn open_window(&mut self, kind: WindowKind) {
        let length = match kind {
            WindowKind::Peek => self.config.peek_window,
            WindowKind::Look | WindowKind::Joker => self.config.power_window,
            WindowKind::Respond => self.config.respond_window,
        };
        self.generation += 1;
        let window = TimedWindow {
            kind,
            deadline: self.clock.now() + length,
            generation: self.generation,
        };
        debug!(?kind, generation = window.generation, "window opened");
        self.window = Some(window);
    }

    pub(super) fn close_window(&mut self) {
        if self.window.take().is_some() {
            self.generation += 1;
        }
    }

    fn handle_expire(&mut self, generation: u64) -> Result<(), CommandError> {
        let window = match self.window {
            Some(window) if window.generation == generation => window,
            _ => {
                debug!(generation, current = self.generation, "stale window callback ignored");
                return Err(CommandError::StaleWindow { generation });
            }
        };

        self.window = None;
        match window.kind {
            WindowKind::Peek => self.peek_expired(),
            WindowKind::Look | WindowKind::Joker => self.finish_power(),
            WindowKind::Respond => self.respond_expired(),
        }
        Ok(())
    }

    /// Expire every window whose deadline has passed on the session clock.
    ///
    /// Returns how many windows were expired. Hosts without a scheduler can
    /// call this periodically instead of issuing `Expire` commands.
    pub fn poll_deadlines(&mut self) -> usize {
        let mut expired = 0;
        while let Some(window) = self.window {
            if !window.is_expired(self.clock.now()) {
                break;
            }
            if self.apply(Command::Expire { generation: window.generation }).is_err() {
                break;
            }
            expired += 1;
        }
        expired
    }

    // === Game over ===

    /// Score the hands as they are right now and stop the session.
    pub(super) fn end_game(&mut self) {
        self.close_window();
        self.power = None;
        self.respond = None;
        self.peek_seat = None;
        let result = GameResult::from_hands(&self.hands);
        info!(winners = ?result.winners, scores = ?result.scores, "game over");
        self.result = Some(result);
        self.set_phase(Phase::GameOver);
    }

    // === Invariants ===

    /// Verify that the deck, hands, discard pile and pending drawn card hold
    /// exactly the 52 distinct cards of one deck.
    #[must_use]
    pub fn check_conservation(&self) -> bool {
        let all: Vec<Card> = self
            .deck
            .cards()
            .iter()
            .chain(self.hands.iter().flat_map(|(_, hand)| hand.iter()))
            .chain(self.pile.cards().iter())
            .chain(self.drawn.iter())
            .copied()
            .collect();
        let distinct: FxHashSet<Card> = all.iter().copied().collect();
        all.len() == DECK_SIZE && distinct.len() == DECK_SIZE
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn turn_order(&self) -> &TurnOrder {
        &self.config.turn_order
    }

    /// Seed the deck was shuffled with, if it was shuffled by the session.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    #[must_use]
    pub fn discard_pile(&self) -> &DiscardPile {
        &self.pile
    }

    /// Seat whose peek window is open.
    #[must_use]
    pub fn peek_seat(&self) -> Option<SeatId> {
        self.peek_seat
    }

    /// Slots the peeking seat has revealed in its current window.
    #[must_use]
    pub fn peek_revealed(&self) -> &[usize] {
        &self.peek_revealed
    }

    #[must_use]
    pub fn turn_seat(&self) -> SeatId {
        self.turn_seat
    }

    #[must_use]
    pub fn turn_step(&self) -> TurnStep {
        self.turn_step
    }

    #[must_use]
    pub fn drawn_card(&self) -> Option<Card> {
        self.drawn
    }

    #[must_use]
    pub fn power(&self) -> Option<&PowerState> {
        self.power.as_ref()
    }

    #[must_use]
    pub fn joker_first_pick(&self) -> Option<Slot> {
        self.power.and_then(|p| p.joker_first)
    }

    #[must_use]
    pub fn look_result(&self) -> Option<&LookReveal> {
        self.look_result.as_ref()
    }

    #[must_use]
    pub fn respond_state(&self) -> Option<&RespondState> {
        self.respond.as_ref()
    }

    /// Seat whose respond slot is open. `None` outside the respond phase.
    #[must_use]
    pub fn responder(&self) -> Option<SeatId> {
        if self.phase != Phase::Respond {
            return None;
        }
        self.respond.as_ref().and_then(RespondState::responder)
    }

    /// Seat that receives the turn once the respond window closes.
    #[must_use]
    pub fn pending_next_turn(&self) -> SeatId {
        self.pending_next_turn
    }

    #[must_use]
    pub fn declarer(&self) -> Option<SeatId> {
        self.declarer
    }

    #[must_use]
    pub fn active_window(&self) -> Option<TimedWindow> {
        self.window
    }

    /// Time left in the active window.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.window.map(|w| w.remaining(self.clock.now()))
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &Vector<CommandRecord> {
        &self.history
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ManualClock;

    fn session() -> GameSession<ManualClock> {
        GameSession::with_clock(SessionConfig::default(), Some(42), ManualClock::new()).unwrap()
    }

    #[test]
    fn test_new_session_is_in_init() {
        let session = session();

        assert_eq!(session.phase(), Phase::Init);
        assert_eq!(session.deck().len(), DECK_SIZE);
        assert_eq!(session.hands().total_cards(), 0);
        assert!(session.active_window().is_none());
        assert_eq!(session.seed(), Some(42));
        assert!(session.check_conservation());
    }

    #[test]
    fn test_same_seed_same_deck() {
        let a = session();
        let b = session();
        assert_eq!(a.deck(), b.deck());
    }

    #[test]
    fn test_from_deck_rejects_incomplete_deck() {
        let deck = Deck::from_cards(Deck::standard().cards().iter().copied().take(51));
        let err = GameSession::from_deck(SessionConfig::default(), deck, ManualClock::new());
        assert!(matches!(err, Err(ConfigError::IncompleteDeck(51))));
    }

    #[test]
    fn test_rejected_command_is_not_recorded() {
        let mut session = session();

        let err = session.apply(Command::DrawFromDeck).unwrap_err();
        assert_eq!(
            err,
            CommandError::InvalidPhaseForCommand { command: "draw_from_deck", phase: Phase::Init }
        );
        assert!(session.history().is_empty());
        assert_eq!(session.deck().len(), DECK_SIZE);
    }

    #[test]
    fn test_stale_generation_is_rejected() {
        let mut session = session();
        session.apply(Command::DealAll).unwrap();
        let window = session.active_window().unwrap();

        assert_eq!(
            session.apply(Command::Expire { generation: window.generation + 1 }),
            Err(CommandError::StaleWindow { generation: window.generation + 1 })
        );
        assert_eq!(session.active_window(), Some(window));
    }

    #[test]
    fn test_poll_deadlines_waits_for_clock() {
        let clock = ManualClock::new();
        let mut session =
            GameSession::with_clock(SessionConfig::default(), Some(1), clock.clone()).unwrap();
        session.apply(Command::DealAll).unwrap();
        let first = session.peek_seat();

        clock.advance(Duration::from_secs(4));
        assert_eq!(session.poll_deadlines(), 0);
        assert_eq!(session.remaining(), Some(Duration::from_secs(1)));

        clock.advance(Duration::from_secs(1));
        assert_eq!(session.poll_deadlines(), 1);
        assert_ne!(session.peek_seat(), first);
    }
}
