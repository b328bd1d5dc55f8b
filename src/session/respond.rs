//! Respond window: stacking plays after a card hits the discard pile.
//!
//! Seats get one timed slot each, starting with the seat who just played and
//! going round in turn order. The active responder may play any one card
//! from their own hand. A rank mismatch costs penalty cards. Any response
//! restarts the order from the responder, retargets the window to the played
//! rank, and can open a new power window.

use tracing::{debug, info};

use super::state::{GameSession, Phase, RespondState};
use super::window::{Clock, WindowKind};
use crate::cards::Slot;
use crate::core::{Command, CommandError, SeatId};

impl<C: Clock> GameSession<C> {
    /// Play slot `index` of `seat`'s hand onto the discard pile.
    pub fn respond_play(&mut self, seat: SeatId, index: usize) -> Result<(), CommandError> {
        self.apply(Command::RespondPlay { seat, index })
    }

    /// Declare end of round for the seat at the head of a fresh respond window.
    pub fn declare_end(&mut self) -> Result<(), CommandError> {
        self.apply(Command::DeclareEnd)
    }

    /// Whether `declare_end` would be accepted right now.
    #[must_use]
    pub fn can_declare_end(&self) -> bool {
        self.phase == Phase::Respond
            && self.declarer.is_none()
            && self
                .respond
                .as_ref()
                .is_some_and(|r| r.index == 0 && !r.restarted)
    }

    pub(super) fn open_respond_window(&mut self) {
        if self.phase != Phase::Respond {
            self.set_phase(Phase::Respond);
        }
        self.open_window(WindowKind::Respond);
    }

    pub(super) fn handle_respond_play(&mut self, slot: Slot) -> Result<(), CommandError> {
        self.require_phase("respond_play", Phase::Respond)?;
        let (responder, target) = self
            .respond
            .as_ref()
            .and_then(|r| r.responder().map(|seat| (seat, r.target)))
            .ok_or_else(|| self.wrong_phase("respond_play"))?;
        if slot.seat != responder {
            return Err(CommandError::NotYourTurn {
                expected: responder,
                actual: slot.seat,
            });
        }
        if self.hands.is_empty(slot.seat) {
            return Err(CommandError::EmptyHandResponse(slot.seat));
        }

        let card = self.hands.remove_at(slot)?;
        self.pile.discard(card);
        let matched = card.rank == target;
        info!(seat = %slot.seat, %card, %target, matched, "response played");

        if self.hands.is_empty(slot.seat) {
            self.end_game();
            return Ok(());
        }

        if !matched {
            let penalty = self.deck.draw_up_to(self.config.penalty_cards);
            debug!(seat = %slot.seat, drawn = penalty.len(), "penalty draw");
            self.hands.append(slot.seat, penalty);
        }

        self.respond = Some(RespondState::opened_by(
            &self.config.turn_order,
            slot.seat,
            card.rank,
            true,
        ));
        self.trigger_power_or_respond(slot.seat, card.rank);
        Ok(())
    }

    pub(super) fn handle_declare_end(&mut self) -> Result<(), CommandError> {
        self.require_phase("declare_end", Phase::Respond)?;
        if !self.can_declare_end() {
            return Err(CommandError::DeclareNotAllowed);
        }
        let seat = self
            .respond
            .as_ref()
            .and_then(|r| r.order.first().copied())
            .ok_or(CommandError::DeclareNotAllowed)?;

        info!(%seat, "end declared");
        self.declarer = Some(seat);
        Ok(())
    }

    pub(super) fn respond_expired(&mut self) {
        let Some(respond) = self.respond.as_mut() else {
            self.finish_respond();
            return;
        };

        if respond.index + 1 >= respond.order.len() {
            self.finish_respond();
        } else {
            respond.index += 1;
            self.open_window(WindowKind::Respond);
        }
    }

    fn finish_respond(&mut self) {
        self.close_window();
        self.respond = None;

        let next = self.pending_next_turn;
        if self.declarer == Some(next) {
            info!(declarer = %next, "play returned to declarer");
            self.end_game();
        } else {
            self.begin_turn(next);
        }
    }
}
